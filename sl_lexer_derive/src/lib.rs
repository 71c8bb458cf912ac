/**
 * The derive macro implementation that implements the trait 'TokenKind' for a
 * token-kind enum.
 */

extern crate proc_macro;
extern crate proc_macro2;
extern crate sl_regex_parse;
extern crate syn;
extern crate quote;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Attribute, Fields, Ident, ItemEnum, LitStr, Token};
use sl_regex_parse::{escape, RegexParser};

// Identifier for the front-end lexer library
const FRONT_LIBRARY_NAME: &str = "sl_lexer";
// Attribute name for a raw-string token
const ATTRIBUTE_TOKEN: &str = "token";
// Attribute name for a regex-token
const ATTRIBUTE_REGEX: &str = "regex";
// Attribute name for kinds dropped from the output
const ATTRIBUTE_SKIP: &str = "skip";
// Attribute name binding a variant to the predefined space symbol
const ATTRIBUTE_SPACE: &str = "space";
// Attribute name binding a variant to the predefined line feed symbol
const ATTRIBUTE_NEWLINE: &str = "newline";
// Enum attribute for the line comment delimiter
const ATTRIBUTE_LINE_COMMENT: &str = "line_comment";
// Enum attribute for the block comment delimiters
const ATTRIBUTE_BLOCK_COMMENT: &str = "block_comment";

struct TokenDefinition {
    variant_ident: Ident,
    regex_str: String,
}

enum SymbolBinding {
    // Offset from the start id
    Own(u32),
    Space,
    Newline,
}

struct VariantData {
    ident: Ident,
    binding: SymbolBinding,
}

struct LexerData {
    enum_name: Ident,
    variants: Vec<VariantData>,
    tokens: Vec<TokenDefinition>,
    skipped: Vec<Ident>,
    newline: Option<Ident>,
    line_comment: Option<String>,
    block_comment: Option<(String, String)>,
}

#[proc_macro_derive(TokenKind, attributes(
    token,
    regex,
    skip,
    space,
    newline,
    line_comment,
    block_comment,
))]
pub fn sl_token_kind(item: TokenStream) -> TokenStream {
    let enm = parse_macro_input!(item as ItemEnum);
    match parse_attributes(&enm) {
        Ok(data) => generate(data).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate(data: LexerData) -> TokenStream2 {
    let lib = quote::format_ident!("{}", FRONT_LIBRARY_NAME);
    let enum_name = &data.enum_name;

    let pattern_strs = data.tokens.iter().map(|t| &t.regex_str);
    let pattern_vars = data.tokens.iter().map(|t| &t.variant_ident);

    let vars: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();
    let symbols: Vec<_> = data.variants.iter().map(|v| match v.binding {
        SymbolBinding::Own(offset) => {
            let name = v.ident.to_string();
            quote!{ ::#lib::Symbol::terminal(::#lib::Symbol::START_ID + #offset, #name) }
        },
        SymbolBinding::Space => quote!{ ::#lib::Symbol::SPACE },
        SymbolBinding::Newline => quote!{ ::#lib::Symbol::LF },
    }).collect();

    let skipped = &data.skipped;
    let newline = match &data.newline {
        Some(v) => quote!{ ::std::option::Option::Some(#enum_name::#v) },
        None => quote!{ ::std::option::Option::None },
    };
    let line_comment = match &data.line_comment {
        Some(s) => quote!{ ::std::option::Option::Some(#s) },
        None => quote!{ ::std::option::Option::None },
    };
    let block_comment = match &data.block_comment {
        Some((s, e)) => quote!{ ::std::option::Option::Some((#s, #e)) },
        None => quote!{ ::std::option::Option::None },
    };

    quote!{
        impl ::#lib::TokenKind for #enum_name {
            fn patterns() -> &'static [(&'static str, Self)] {
                &[#((#pattern_strs, #enum_name::#pattern_vars)),*]
            }

            fn symbol(self) -> ::#lib::Symbol {
                match self {
                    #(#enum_name::#vars => #symbols,)*
                }
            }

            fn from_symbol(symbol: ::#lib::Symbol) -> ::std::option::Option<Self> {
                #(
                    if symbol == #symbols {
                        return ::std::option::Option::Some(#enum_name::#vars);
                    }
                )*
                ::std::option::Option::None
            }

            fn ignored() -> &'static [Self] {
                &[#(#enum_name::#skipped),*]
            }

            fn newline() -> ::std::option::Option<Self> {
                #newline
            }

            fn line_comment() -> ::std::option::Option<&'static str> {
                #line_comment
            }

            fn block_comment() -> ::std::option::Option<(&'static str, &'static str)> {
                #block_comment
            }
        }
    }
}

/// The pattern must compile, so a typo surfaces at the attribute and not
/// when the tokenizer is first built.
fn validate_pattern(lit: &LitStr, pattern: &str) -> syn::Result<()> {
    RegexParser::new()
        .parse_to_component(pattern)
        .map(|_| ())
        .map_err(|err| syn::Error::new_spanned(lit, format!("malformed token pattern: {}", err)))
}

fn expect_no_args(attr: &Attribute, name: &str) -> syn::Result<()> {
    if attr.tokens.is_empty() {
        Ok(())
    }
    else {
        Err(syn::Error::new_spanned(attr, format!("'{}' requires no arguments", name)))
    }
}

fn parse_attributes(enm: &ItemEnum) -> syn::Result<LexerData> {
    if !enm.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&enm.generics, "token kinds can not be generic"));
    }

    let mut line_comment = None;
    let mut block_comment = None;
    for attr in &enm.attrs {
        if attr.path.is_ident(ATTRIBUTE_LINE_COMMENT) {
            let start = attr.parse_args::<LitStr>()?;
            line_comment = Some(start.value());
        }
        else if attr.path.is_ident(ATTRIBUTE_BLOCK_COMMENT) {
            let delims = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
            let delims: Vec<_> = delims.into_iter().collect();
            if delims.len() != 2 {
                return Err(syn::Error::new_spanned(attr, "'block_comment' needs a start and an end delimiter"));
            }
            block_comment = Some((delims[0].value(), delims[1].value()));
        }
    }

    let mut variants = Vec::new();
    let mut tokens = Vec::new();
    let mut skipped = Vec::new();
    let mut newline = None;
    let mut own_symbols = 0u32;

    for variant in &enm.variants {
        // Only unit variants can be token kinds
        match variant.fields {
            Fields::Unit => { },
            _ => return Err(syn::Error::new_spanned(variant, "token kinds can only be unit-like variants")),
        }

        let variant_ident = variant.ident.clone();
        let mut binding = None;

        for attr in &variant.attrs {
            if attr.path.is_ident(ATTRIBUTE_TOKEN) {
                let token = attr.parse_args::<LitStr>()?;
                let regex_str = escape(&token.value());
                validate_pattern(&token, &regex_str)?;
                tokens.push(TokenDefinition{ variant_ident: variant_ident.clone(), regex_str });
            }
            else if attr.path.is_ident(ATTRIBUTE_REGEX) {
                let regex = attr.parse_args::<LitStr>()?;
                let regex_str = regex.value();
                validate_pattern(&regex, &regex_str)?;
                tokens.push(TokenDefinition{ variant_ident: variant_ident.clone(), regex_str });
            }
            else if attr.path.is_ident(ATTRIBUTE_SKIP) {
                expect_no_args(attr, ATTRIBUTE_SKIP)?;
                skipped.push(variant_ident.clone());
            }
            else if attr.path.is_ident(ATTRIBUTE_SPACE) || attr.path.is_ident(ATTRIBUTE_NEWLINE) {
                let is_space = attr.path.is_ident(ATTRIBUTE_SPACE);
                expect_no_args(attr, if is_space { ATTRIBUTE_SPACE } else { ATTRIBUTE_NEWLINE })?;
                if binding.is_some() {
                    return Err(syn::Error::new_spanned(attr, "a variant can be bound to one predefined symbol only"));
                }
                if is_space {
                    binding = Some(SymbolBinding::Space);
                }
                else {
                    if newline.is_some() {
                        return Err(syn::Error::new_spanned(attr, "only one variant can be 'newline'"));
                    }
                    newline = Some(variant_ident.clone());
                    binding = Some(SymbolBinding::Newline);
                }
            }
        }

        let binding = match binding {
            Some(b) => b,
            None => {
                own_symbols += 1;
                SymbolBinding::Own(own_symbols)
            },
        };
        variants.push(VariantData{ ident: variant_ident, binding });
    }

    Ok(LexerData{
        enum_name: enm.ident.clone(),
        variants,
        tokens,
        skipped,
        newline,
        line_comment,
        block_comment,
    })
}
