/// Receives the rewriting steps applied by the simplifier, in order.
///
/// Pass `&mut ()` to discard them, or a `Vec<Step>` to record them.
pub trait StepCollector<S> {
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}

/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `a+(b+c) = a+b+c`
    /// `a*(b*c) = a*b*c`
    Flatten,

    /// `0+a = a`
    /// `a+0 = a`
    AddZero,

    /// `0*a = 0`
    /// `a*0 = 0`
    MultiplyZero,

    /// `1*a = a`
    /// `a*1 = a`
    MultiplyOne,

    /// `a+a = 2a`
    /// `2a+3a = 5a`
    /// `1/2+1/3 = 5/6`
    CombineLikeTerms,

    /// `a*a = a^2`
    /// `a^2*a^3 = a^5`
    /// `2*3 = 6`
    CombineLikeFactors,

    /// `a^0 = 1`
    PowerZero,

    /// `0^a = 0`, for positive `a`
    PowerZeroLeft,

    /// `1^a = 1`
    PowerOneLeft,

    /// `a^1 = a`
    PowerOne,

    /// `2^3 = 8`
    /// `(4/9)^(1/2) = 2/3`
    EvaluatePower,

    /// `(a^b)^c = a^(b*c)`, for integer `c`
    PowerPower,

    /// `(a*b)^c = a^c*b^c`, for integer `c`
    DistributePower,
}
