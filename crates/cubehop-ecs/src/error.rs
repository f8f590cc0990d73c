/// Errors raised by the component store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    #[error("entity capacity of {capacity} exhausted")]
    CapacityExhausted { capacity: usize },
}
