use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident};

pub fn derive_item(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match named_fields(&input) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    // #[item(id)] or a field literally named `id`
    let id_field = match marked_field(&fields, "id").or_else(|| field_named(&fields, "id")) {
        Some(ident) => ident,
        None => {
            return syn::Error::new_spanned(
                name,
                "Item derive: no field marked with #[item(id)] and no field named `id`",
            )
            .to_compile_error()
            .into();
        }
    };

    let quantified = marked_field(&fields, "count").map(|count_field| {
        quote! {
            impl storefront_sync::Quantified for #name {
                fn count(&self) -> i64 {
                    self.#count_field
                }

                fn set_count(&mut self, count: i64) {
                    self.#count_field = count;
                }
            }
        }
    });

    let expanded = quote! {
        impl storefront_sync::Item for #name {
            fn id(&self) -> &str {
                &self.#id_field
            }
        }

        #quantified
    };

    TokenStream::from(expanded)
}

fn named_fields(input: &DeriveInput) -> syn::Result<Vec<&syn::Field>> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(fields.named.iter().collect());
        }
    }
    Err(syn::Error::new_spanned(
        &input.ident,
        "Item derive: only structs with named fields are supported",
    ))
}

fn marked_field(fields: &[&syn::Field], marker: &str) -> Option<Ident> {
    for field in fields {
        for attr in &field.attrs {
            if !attr.path().is_ident("item") {
                continue;
            }
            let mut found = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(marker) {
                    found = true;
                }
                Ok(())
            });
            if found {
                return field.ident.clone();
            }
        }
    }
    None
}

fn field_named(fields: &[&syn::Field], name: &str) -> Option<Ident> {
    fields
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == name)
        .cloned()
}
