use cas_attrs::ErrorKind;
use cas_error::{Error, ErrorKind};
use pretty_assertions::assert_eq;

#[derive(Debug, ErrorKind)]
#[error(
    message = format!("unknown function `{}`", name),
    labels = ["this function"],
    help = "check the spelling",
)]
struct UnknownFunction {
    name: String,
}

#[derive(Debug, ErrorKind)]
#[error(message = "no unknown variable was set")]
struct MissingUnknown;

#[test]
fn message_uses_fields() {
    let err = Error::new(vec![0..3], UnknownFunction { name: "sni".to_string() });
    assert_eq!(err.message(), "unknown function `sni`");
    assert_eq!(err.to_string(), "unknown function `sni`");
}

#[test]
fn report_mentions_message() {
    let err = Error::new(vec![0..3], UnknownFunction { name: "sni".to_string() });
    let report = strip_ansi_escapes::strip_str(err.report_to_string("input", "sni(x)"));
    assert!(report.contains("unknown function `sni`"));
    assert!(report.contains("this function"));
    assert!(report.contains("check the spelling"));
}

#[test]
fn spanless_report() {
    let err = Error::spanless(MissingUnknown);
    assert!(err.spans.is_empty());
    assert_eq!(err.message(), "no unknown variable was set");

    // a span-less error still renders, pointing at the start of the input
    let _ = err.build_report("input");
}
