/// A record with a stable identity inside a [`Collection`](super::Collection).
///
/// Usually implemented with `#[derive(Item)]`.
pub trait Item: Clone + Send + Sync + 'static {
    /// Returns the identifier used for lookup and diffing.
    fn id(&self) -> &str;
}

/// An item that carries a quantity, such as a cart line.
pub trait Quantified: Item {
    fn count(&self) -> i64;

    fn set_count(&mut self, count: i64);
}

/// An item that can be shown before the server has described it.
///
/// Optimistic inserts only know the id; the reconciling refetch fills in
/// the rest.
pub trait Placeholder: Item {
    fn placeholder(id: &str) -> Self;
}
