/// The three phases every node passes through, in order. There is no path
/// back to an earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Election,
    Running,
}
