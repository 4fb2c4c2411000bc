use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, Pat, PatType, Type};

fn formatted_arg_error_msg(arg_name: &str, arg_pos: usize, fn_name: &str) -> String {
    format!(
        "Expected argument {} ('{}') to be f64, for {}",
        arg_pos, arg_name, fn_name
    )
}

/// Turns `fn name(a: f64, b: f64) -> Result<f64, MathError>` into a table entry
/// `fn name(args: &[f64]) -> Result<f64, MathError>` that checks the argument
/// count before binding each parameter positionally.
///
/// The expansion names `MathError` unqualified, so it must be in scope where the
/// attribute is used.
#[proc_macro_attribute]
pub fn math_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let fn_attrs = &input.attrs;
    let fn_vis = &input.vis;
    let fn_name = &input.sig.ident;
    let fn_args = &input.sig.inputs;
    let fn_body = &input.block;
    let fn_output = &input.sig.output;

    let mut arg_extractions = Vec::new();

    for (i, arg) in fn_args.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return syn::Error::new_spanned(arg, "math functions cannot take `self`")
                .to_compile_error()
                .into();
        };

        let arg_name = match **pat {
            Pat::Ident(ref ident) => ident.ident.to_string(),
            _ => {
                return syn::Error::new_spanned(pat, "Unsupported pattern")
                    .to_compile_error()
                    .into()
            }
        };

        let is_f64 = match **ty {
            Type::Path(ref type_path) => type_path.path.is_ident("f64"),
            _ => false,
        };
        if !is_f64 {
            let err_msg = formatted_arg_error_msg(&arg_name, i, &fn_name.to_string());
            return syn::Error::new_spanned(ty, err_msg).to_compile_error().into();
        }

        arg_extractions.push(quote! {
            let #pat = args[#i];
        });
    }

    let args_len = arg_extractions.len();
    let expanded = quote! {
        #(#fn_attrs)*
        #fn_vis fn #fn_name(args: &[f64]) #fn_output {
            if args.len() != #args_len {
                return Err(MathError::Arity {
                    expected: #args_len,
                    found: args.len(),
                });
            }

            #(#arg_extractions)*

            #fn_body
        }
    };

    TokenStream::from(expanded)
}
