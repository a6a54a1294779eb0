use quote::{format_ident, quote};

/// Generates one `#[test]` per `.lox` fixture below `bin/tests`, each calling `lox_expect`.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/..", env!("CARGO_MANIFEST_DIR"));
    let mut fixtures = walkdir::WalkDir::new(&root_dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .peekable();

    if fixtures.peek().is_none() {
        return syn::Error::new(proc_macro2::Span::call_site(), format!("no .lox fixtures in {root_dir}"))
            .to_compile_error()
            .into();
    }

    let tests = fixtures.map(|entry| {
        let fixture_path = entry.path().to_string_lossy().to_string();
        let relative_path = entry
            .path()
            .strip_prefix(&root_dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .to_string();
        let test_ident = format_ident!(
            "test_{}",
            relative_path.trim_end_matches(".lox").replace(['/', '-', '.'], "_")
        );
        quote! {
            #[test]
            fn #test_ident() {
                lox_expect(&std::fs::read_to_string(#fixture_path).unwrap());
            }
        }
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            let _ = env_logger::builder().is_test(true).try_init();
        }

        #(#tests)*
    }
    .into()
}
