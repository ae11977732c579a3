/// A type that collects the steps taken by the simplifier.
///
/// [`StepCollector`] is also implemented for the unit type `()`. This is useful when only the
/// simplified tree is wanted, such as when computing the final answer of an expression during step
/// assessment.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);

    /// Returns true if pushed steps are kept. Callers can skip building steps that would be
    /// discarded.
    fn is_recording(&self) -> bool {
        true
    }
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}

    #[inline]
    fn is_recording(&self) -> bool {
        false
    }
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}
