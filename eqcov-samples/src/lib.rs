//! Small payloads whose test suites declare equivalence-class and boundary
//! coverage and are audited by `eqcov`.

pub mod array;
pub mod sequence;
pub mod stream;

pub use array::{ArrayError, equals};
pub use sequence::SequenceTracker;
pub use stream::{StreamError, StreamProvider, StreamUser, StreamVerifier};
