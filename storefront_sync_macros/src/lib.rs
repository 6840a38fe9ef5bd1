mod item;

use proc_macro::TokenStream;

/// Derive `storefront_sync::Item` for a struct, and `storefront_sync::Quantified`
/// when one field is marked `#[item(count)]`.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Debug, PartialEq, Item)]
/// struct Line {
///     #[item(id)]
///     sku: String,
///     #[item(count)]
///     qty: i64,
/// }
/// ```
///
/// Without `#[item(id)]` the field named `id` is used.
#[proc_macro_derive(Item, attributes(item))]
pub fn derive_item(input: TokenStream) -> TokenStream {
    item::derive_item(input)
}
