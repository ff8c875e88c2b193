use std::iter;

use const_random::const_random;
use convert_case::{Case, Casing};
use either::Either::{Left, Right};
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, format_ident, quote};
use syn::{parse::Parse, spanned::Spanned, visit::Visit, *};

/// The alternatives one match arm splits off, with the pattern to apply to
/// each of them.
#[derive(Default)]
struct AltPat {
    root_ident: Option<PatIdent>,
    is_wildcard: bool,
    alternatives: Vec<Type>,
    alternative_pats: Vec<Pat>,
    is_refutable: bool,

    is_in_subpat: bool,
    err: Option<Error>,
}

impl AltPat {
    fn check_ty(&mut self, ty: &Type) -> bool {
        if self.alternatives.iter().any(|d| d == ty) {
            self.err = Some(Error::new_spanned(
                ty,
                "matching the same alternative type in several branches of one arm is not supported",
            ));
            return false;
        }
        true
    }

    fn check_ty_with_other(&self, other: &Self) -> Option<Error> {
        self.alternatives.iter().find_map(|d| {
            let any = other.alternatives.iter().any(|e| d == e);
            (any && !self.is_refutable && !other.is_refutable).then(|| {
                Error::new_spanned(
                    d,
                    "this alternative is already matched exhaustively by an earlier arm",
                )
            })
        })
    }

    fn push_ty(&mut self, ty: Type, root_ident: Option<PatIdent>, i: &Pat) {
        self.alternatives.push(ty);
        self.alternative_pats.push(match root_ident {
            Some(mut pi) => {
                pi.subpat = Some((<Token![@]>::default(), Box::new(i.clone())));
                Pat::Ident(pi)
            }
            None => i.clone(),
        });
    }

    fn literal_ty(&mut self, i: &Pat, lit: &Lit) -> Option<Type> {
        let suffix = match lit {
            Lit::Str(_) => return Some(parse_quote!(&str)),
            Lit::ByteStr(_) => return Some(parse_quote!(&[u8])),
            Lit::CStr(_) => return Some(parse_quote!(&::core::ffi::CStr)),
            Lit::Byte(_) => return Some(parse_quote!(u8)),
            Lit::Char(_) => return Some(parse_quote!(char)),
            Lit::Bool(_) => return Some(parse_quote!(bool)),
            Lit::Int(int) => int.suffix(),
            Lit::Float(float) => float.suffix(),
            _ => {
                self.err = Some(Error::new_spanned(
                    i,
                    format_args!("pattern `{}` is not supported", i.to_token_stream()),
                ));
                return None;
            }
        };
        parse_str(suffix)
            .inspect_err(|_| {
                self.err = Some(Error::new_spanned(
                    i,
                    "numeric literals need a type suffix to name their alternative",
                ))
            })
            .ok()
    }
}

impl Visit<'_> for AltPat {
    fn visit_pat(&mut self, i: &Pat) {
        match i {
            Pat::Ident(pi) if !self.is_in_subpat => {
                let s = pi.ident.to_string();
                if pi.subpat.is_none() && s.is_case(Case::Pascal) {
                    let ty = Type::Path(TypePath {
                        qself: None,
                        path: Path::from(pi.ident.clone()),
                    });

                    if self.check_ty(&ty) {
                        let root_ident = self.root_ident.take();
                        self.push_ty(ty, root_ident, i);
                    }

                    return;
                }

                let mut pat_ident = pi.clone();
                pat_ident.subpat = None;
                self.root_ident = Some(pat_ident);
                visit::visit_pat(self, i);
            }

            Pat::Struct(PatStruct { qself, path, .. })
            | Pat::TupleStruct(PatTupleStruct { qself, path, .. })
            | Pat::Path(PatPath { qself, path, .. })
                if !self.is_in_subpat =>
            {
                let ty = Type::Path(TypePath {
                    qself: qself.clone(),
                    path: path.clone(),
                });

                if self.check_ty(&ty) {
                    let root_ident = self.root_ident.take();

                    self.is_in_subpat = true;
                    visit::visit_pat(self, i);
                    self.is_in_subpat = false;

                    self.push_ty(ty, root_ident, i);
                }
            }

            Pat::Type(PatType { pat, ty, .. }) if !self.is_in_subpat => {
                if self.check_ty(ty) {
                    let root_ident = self.root_ident.take();

                    self.is_in_subpat = true;
                    self.visit_pat(pat);
                    self.is_in_subpat = false;

                    self.push_ty((**ty).clone(), root_ident, pat);
                }
            }

            Pat::Paren(_) => visit::visit_pat(self, i),
            Pat::Or(_) => {
                if !self.is_in_subpat
                    && let Some(pi) = self.root_ident.take()
                {
                    self.err = Some(Error::new_spanned(
                        pi,
                        "binding one name across several alternative types is not supported",
                    ));
                    return;
                }
                visit::visit_pat(self, i)
            }

            Pat::Lit(lit) if !self.is_in_subpat => {
                self.is_refutable = true;
                if let Some(ty) = self.literal_ty(i, &lit.lit)
                    && self.check_ty(&ty)
                {
                    let root_ident = self.root_ident.take();
                    self.push_ty(ty, root_ident, i);
                }
            }

            Pat::Wild(_) | Pat::Rest(_) if !self.is_in_subpat => {
                self.is_wildcard = true;
            }

            Pat::Const(_)
            | Pat::Range(_)
            | Pat::Macro(_)
            | Pat::Reference(_)
            | Pat::Slice(_)
            | Pat::Verbatim(_)
            | Pat::Tuple(_)
                if !self.is_in_subpat =>
            {
                self.err = Some(Error::new_spanned(
                    i,
                    format_args!(
                        "cannot infer the alternative of pattern `{}`; write it as `binding: Type`",
                        i.to_token_stream()
                    ),
                ))
            }

            Pat::Const(_) | Pat::Lit(_) | Pat::Range(_) => {
                self.is_refutable = true;
                visit::visit_pat(self, i)
            }

            _ => visit::visit_pat(self, i),
        }
    }
}

pub struct MatchArm {
    pat: AltPat,
    guard: Option<Box<Expr>>,
    expr: Box<Expr>,
}

impl Parse for MatchArm {
    fn parse(input: parse::ParseStream<'_>) -> Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        if let (Some(first), Some(last)) = (attrs.first(), attrs.last()) {
            return Err(Error::new(
                first.span().join(last.span()).unwrap_or_else(|| first.span()),
                "attributes on match arms are not supported",
            ));
        }

        let mut pat = Pat::parse_multi_with_leading_vert(input)?;
        if input.peek(Token![:]) {
            pat = Pat::Type(PatType {
                attrs: Vec::new(),
                pat: Box::new(pat),
                colon_token: input.parse()?,
                ty: input.parse()?,
            });
        }

        let guard = match input.parse::<Option<Token![if]>>()? {
            Some(_) => Some(input.parse::<Box<Expr>>()?),
            None => None,
        };
        input.parse::<Token![=>]>()?;
        let expr = input.parse::<Box<Expr>>()?;

        let is_block_like = matches!(
            *expr,
            Expr::Block(_)
                | Expr::If(_)
                | Expr::Match(_)
                | Expr::Loop(_)
                | Expr::While(_)
                | Expr::ForLoop(_)
                | Expr::Unsafe(_)
        );
        if input.parse::<Option<Token![,]>>()?.is_none() && !is_block_like && !input.is_empty() {
            return Err(input.error("expected `,` after a match arm"));
        }

        let mut alts = AltPat::default();
        alts.visit_pat(&pat);

        if let Some(err) = alts.err.take() {
            return Err(err);
        }

        if alts.alternatives.is_empty() && !alts.is_wildcard {
            return Err(Error::new_spanned(
                pat,
                "cannot infer the alternative type; name it with a type path or `binding: Type`",
            ));
        }

        if guard.is_some() {
            alts.is_refutable = true;
        }

        Ok(MatchArm {
            pat: alts,
            guard,
            expr,
        })
    }
}

pub struct VariantMatch {
    expr: Box<Expr>,
    attrs: Vec<Attribute>,
    arms: Vec<MatchArm>,
}

impl Parse for VariantMatch {
    fn parse(input: parse::ParseStream<'_>) -> Result<Self> {
        let expr = Box::new(Expr::parse_without_eager_brace(input)?);

        let content;
        braced!(content in input);

        let attrs = Attribute::parse_inner(&content)?;

        let mut arms = Vec::new();
        while !content.is_empty() {
            arms.push(content.parse()?);
        }

        Ok(VariantMatch { expr, attrs, arms })
    }
}

fn expand_body(attrs: &[Attribute], arms: &[MatchArm], base_ident: &Ident) -> TokenStream {
    let body = &Lifetime::new(
        &format!("'__variant_match_body{}", const_random!(u32)),
        Span::call_site(),
    );
    let variant = &quote!(::tvariant::Variant);

    let branches = arms.iter().flat_map(|arm| {
        let MatchArm { pat, guard, expr } = arm;
        let AltPat {
            is_wildcard,
            alternatives,
            alternative_pats,
            is_refutable,
            ..
        } = pat;

        let success = quote! {{
            #[warn(unreachable_code)]
            let ret = { #expr };
            break #body ret;
        }};

        if *is_wildcard {
            Left(iter::once(quote! {
                let #base_ident = match #base_ident.narrow::<(), _>() {
                    #[allow(unreachable_code)]
                    Err(_) => #success,
                    Ok(unreachable) => unreachable,
                };
            }))
        } else {
            let arms = alternatives.iter().zip(alternative_pats);
            Right(arms.map(move |(alternative, pat)| match guard {
                Some(guard) => quote! {
                    let mut #base_ident = #base_ident;
                    #base_ident = match #base_ident.try_unwrap::<#alternative, _>() {
                        #[allow(unreachable_code)]
                        Ok(#pat) if #guard => #success,
                        Ok(res) => #variant::new(res),
                        Err(rem) => rem.broaden(),
                    };
                },
                None if *is_refutable => quote! {
                    let mut #base_ident = #base_ident;
                    #base_ident = match #base_ident.try_unwrap::<#alternative, _>() {
                        #[allow(unreachable_code)]
                        Ok(#pat) => #success,
                        Ok(res) => #variant::new(res),
                        Err(rem) => rem.broaden(),
                    };
                },
                None => quote! {
                    let #base_ident = match #base_ident.try_unwrap::<#alternative, _>() {
                        #[allow(unreachable_code)]
                        Ok(#pat) => #success,
                        Err(rem) => rem,
                    };
                },
            }))
        }
    });

    let rest = quote! {
        let #base_ident: #variant<()> = #base_ident;
        #base_ident.unreachable()
    };

    quote! {#body: {
        #(#attrs)*
        #(#branches)*
        #rest
    }}
}

pub fn expand_match(data: VariantMatch) -> TokenStream {
    let VariantMatch { expr, attrs, arms } = data;
    let base_ident = format_ident!("__variant_match_base{}", const_random!(u32));

    if let Some(err) = (arms.iter().enumerate())
        .flat_map(|(index, a)| arms.iter().take(index).map(move |b| (a, b)))
        .find_map(|(a, b)| a.pat.check_ty_with_other(&b.pat))
    {
        return err.to_compile_error();
    }

    let body = expand_body(&attrs, &arms, &base_ident);
    quote! {{
        let #base_ident = ::tvariant::Variant::ensure_valued(#expr);
        #body
    }}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm(tokens: TokenStream) -> Result<MatchArm> {
        parse2(tokens)
    }

    #[test]
    fn infers_alternatives() {
        let a = arm(quote!(Point { x, y } => x + y,)).unwrap();
        assert_eq!(a.pat.alternatives, [parse_quote!(Point)]);
        assert!(!a.pat.is_refutable);

        let a = arm(quote!(Blank | Wrapped(_) => 0,)).unwrap();
        assert_eq!(a.pat.alternatives, [parse_quote!(Blank), parse_quote!(Wrapped)]);

        let a = arm(quote!(n: i32 => n,)).unwrap();
        assert_eq!(a.pat.alternatives, [parse_quote!(i32)]);
        assert_eq!(a.pat.alternative_pats, [parse_quote!(n)]);

        let a = arm(quote!(1u8 => 0,)).unwrap();
        assert_eq!(a.pat.alternatives, [parse_quote!(u8)]);
        assert!(a.pat.is_refutable);

        let a = arm(quote!(_ => 0,)).unwrap();
        assert!(a.pat.is_wildcard);
    }

    #[test]
    fn root_binding_wraps_the_pattern() {
        let a = arm(quote!(p @ Pair(..) => p,)).unwrap();
        assert_eq!(a.pat.alternatives, [parse_quote!(Pair)]);
        assert_eq!(a.pat.alternative_pats, [parse_quote!(p @ Pair(..))]);
    }

    #[test]
    fn guards_make_arms_refutable() {
        let a = arm(quote!(n: i32 if n > 0 => n,)).unwrap();
        assert!(a.pat.is_refutable);
        assert!(a.guard.is_some());
    }

    #[test]
    fn rejects_uninferable_patterns() {
        assert!(arm(quote!(x => x,)).is_err());
        assert!(arm(quote!(1 => 0,)).is_err());
        assert!(arm(quote!((a, b) => a,)).is_err());
        assert!(arm(quote!(x @ (A | B) => 0,)).is_err());
        assert!(arm(quote!(A | A => 0,)).is_err());
    }

    #[test]
    fn rejects_overlapping_exhaustive_arms() {
        let m: VariantMatch = parse_quote!(v {
            A => 0,
            A => 1,
        });
        let expanded = expand_match(m).to_string();
        assert!(expanded.contains("compile_error"));

        let m: VariantMatch = parse_quote!(v {
            n: i32 if n > 0 => 0,
            n: i32 => 1,
        });
        let expanded = expand_match(m).to_string();
        assert!(!expanded.contains("compile_error"));
        assert!(expanded.contains("ensure_valued"));
    }
}
