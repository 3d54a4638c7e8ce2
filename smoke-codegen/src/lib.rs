use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use quote::quote_spanned;
use std::path::Path;

/// Turn `fn name(config: SmokeConfiguration)` into a test running against a playback server.
///
/// ```ignore
/// #[playback_test("playback_data/get_post.md", configure)]
/// fn get_request_passes(config: SmokeConfiguration) {
///     // `config.base_url()` points at the playback server
/// }
/// ```
///
/// The configuration function receives `&mut api_smoke::SmokeConfiguration` after its base URL
/// has been set. The test panics if the server saw an unexpected request or if any recorded
/// interaction was left unplayed.
#[proc_macro_attribute]
pub fn playback_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    let markdown_name: String;

    if args.len() < 2 {
        return quote! {
            compile_error!("A markdown name and a configuration function should be passed to the macro");
        }
        .into();
    }

    if let syn::NestedMeta::Lit(syn::Lit::Str(parsed_markdown_name)) = &args[0] {
        markdown_name = parsed_markdown_name.value();
        if let Err(stream) = validate_markdown_path(&markdown_name, parsed_markdown_name.span()) {
            return stream.into();
        }
    } else {
        return quote! {
            compile_error!("The first argument should be a string literal!");
        }
        .into();
    }

    let configuration_function;
    if let syn::NestedMeta::Meta(syn::Meta::Path(function_path)) = &args[1] {
        configuration_function = function_path;
    } else {
        let error = quote! {
            compile_error!("The second argument should be a configuration function!");
        };

        return error.into();
    }

    if input.sig.inputs.len() != 1 {
        return quote_spanned! {input.sig.ident.span()=>
            compile_error!("A playback test takes exactly one SmokeConfiguration argument!");
        }
        .into();
    }

    let attributes = &input.attrs;
    let visibility = &input.vis;
    let name = &input.sig.ident;
    let block = &input.block;
    let mut body_signature = input.sig.clone();
    body_signature.ident = syn::Ident::new("__playback_test_body", Span::call_site());

    let output = quote! {
        #[test]
        #(#attributes)*
        #visibility fn #name() {
            #body_signature #block

            let __playback_server = smoke_playback::PlaybackServer::start(#markdown_name)
                .unwrap_or_else(|e| panic!("Playback Error: {}", e));
            let mut __smoke_configuration =
                api_smoke::SmokeConfiguration::new(__playback_server.base_url());
            #configuration_function(&mut __smoke_configuration);

            let __result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                __playback_test_body(__smoke_configuration)
            }));
            let __finished = __playback_server.finish();

            if let Err(e) = __result {
                std::panic::resume_unwind(e);
            }
            if let Err(e) = __finished {
                panic!("Playback Error: {}", e);
            }
        }
    };

    TokenStream::from(output)
}

fn validate_markdown_path<P: AsRef<Path>>(
    path: P,
    span: Span,
) -> Result<(), proc_macro2::TokenStream> {
    if !path.as_ref().to_string_lossy().ends_with(".md") {
        return Err(quote_spanned! {span=>
            compile_error!("The path should point to a .md file!");
        });
    }

    Ok(())
}
