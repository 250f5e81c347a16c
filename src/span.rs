/// a span is simply a location in the source text, from the beginning (lo)
/// to the end (hi) represented as (line, col), both starting at 1. You'll
/// find them in tokens, names, and calls, which is everything the later
/// passes need to point back at the source
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Span {
    pub lo: (usize, usize),
    pub hi: (usize, usize),
}
impl Span {
    pub fn new() -> Self {
        Self::default()
    }
    /// A span covering `len` characters on one line starting at (line, col)
    #[cfg(test)]
    pub(crate) fn at(line: usize, col: usize, len: usize) -> Self {
        Span { lo: (line, col), hi: (line, col + len) }
    }
    /// This is set as in "a set of berries" not "set x to 2". taking a list
    /// of spans, find the span spanning ALL of them, so for example one
    /// being just on line 1 and one on line 3, the set will go from line
    /// 1 to 3. An empty list gives the internal (default) span
    pub fn set(spans: Vec<Span>) -> Span {
        let mut spans = spans.into_iter();
        let first = match spans.next() {
            Some(first) => first,
            None => return Span::new(),
        };
        let mut lo = first.lo;
        let mut hi = first.hi;
        for span in spans {
            // if lower, go lower
            if span.lo < lo {
                lo = span.lo;
            }
            // if higher go higher
            if span.hi > hi {
                hi = span.hi;
            }
        }
        Span { lo, hi }
    }
}
impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if *self == Span::new() {
            write!(f, "internal")
        } else {
            write!(f, "{}:{}", self.lo.0, self.lo.1)
        }
    }
}
