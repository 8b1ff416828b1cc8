//! Embedded product data
//!
//! Storefronts often ship the whole product record inline: a JSON script
//! block (`data-product-json`, `#ProductJson-*`) or a literal assignment such
//! as `var meta = {"product": {...}}` or `window.product = {...}`. Scripts are
//! parsed with swc and only literal values are read; nothing is executed.

use std::collections::HashMap;

use scraper::Html;
use serde_json::Value;
use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};

use crate::page::compile;

/// Product record found in a page's own data blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedProduct {
    pub title: Option<String>,
    /// Raw image references in listed order.
    pub images: Vec<String>,
}

const JSON_BLOCK_SELECTORS: &[&str] = &[
    "script[data-product-json]",
    r#"script[id^="ProductJson"]"#,
    "script#product-json",
    r#"script[type="application/json"][data-product]"#,
];

/// Script variables that commonly hold the product record.
const PRODUCT_VARIABLES: &[&str] = &["product", "productJson", "productJSON", "meta"];

/// First embedded product record on the page.
pub fn read_embedded_product(document: &Html) -> Option<EmbeddedProduct> {
    read_json_blocks(document).or_else(|| read_script_variables(document))
}

fn read_json_blocks(document: &Html) -> Option<EmbeddedProduct> {
    JSON_BLOCK_SELECTORS
        .iter()
        .filter_map(|s| compile(s))
        .find_map(|selector| {
            document.select(&selector).find_map(|element| {
                let text = element.text().collect::<String>();
                match serde_json::from_str::<Value>(text.trim()) {
                    Ok(value) => product_from_json(unwrap_product(&value)),
                    Err(e) => {
                        tracing::debug!(error = %e, "skipping malformed product JSON block");
                        None
                    }
                }
            })
        })
}

fn read_script_variables(document: &Html) -> Option<EmbeddedProduct> {
    let vars = extract_js_variables(document);
    PRODUCT_VARIABLES
        .iter()
        .filter_map(|name| vars.get(*name))
        .find_map(|value| product_from_json(unwrap_product(value)))
}

/// `{"product": {...}}` wrappers hold the record one level down.
fn unwrap_product(value: &Value) -> &Value {
    value.get("product").unwrap_or(value)
}

fn product_from_json(value: &Value) -> Option<EmbeddedProduct> {
    let obj = value.as_object()?;

    let title = ["title", "name"]
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(String::from);

    let mut images = Vec::new();
    for key in ["images", "featured_image", "media"] {
        if let Some(value) = obj.get(key) {
            collect_image_refs(value, &mut images);
        }
    }

    if title.is_none() && images.is_empty() {
        return None;
    }

    Some(EmbeddedProduct { title, images })
}

fn collect_image_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.trim().is_empty() => out.push(s.trim().to_string()),
        Value::Array(items) => {
            for item in items {
                collect_image_refs(item, out);
            }
        }
        Value::Object(obj) => {
            if let Some(src) = ["src", "url"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str))
            {
                out.push(src.to_string());
            }
        }
        _ => {}
    }
}

/// Literal variable values from inline scripts, keyed by variable name.
///
/// For member assignments (`window.product = ...`) the last property name
/// is the key. Later scripts overwrite earlier ones.
pub fn extract_js_variables(document: &Html) -> HashMap<String, Value> {
    let mut result = HashMap::new();
    let Some(selector) = compile(r#"script:not([type]), script[type="text/javascript"]"#) else {
        return result;
    };

    for element in document.select(&selector) {
        let source = element.text().collect::<String>();
        if source.trim().is_empty() {
            continue;
        }

        if let Some(vars) = parse_js_and_extract_vars(&source) {
            result.extend(vars);
        }
    }

    result
}

fn parse_js_and_extract_vars(source: &str) -> Option<HashMap<String, Value>> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), source.to_string());

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        Default::default(),
        StringInput::from(&*fm),
        None,
    );

    let mut parser = Parser::new_from(lexer);

    // Inline scripts are often not valid standalone programs
    let script = match parser.parse_script() {
        Ok(s) => s,
        Err(_) => {
            tracing::debug!("skipping unparseable inline script");
            return None;
        }
    };

    let mut result = HashMap::new();
    for stmt in &script.body {
        extract_vars_from_stmt(stmt, &mut result);
    }

    Some(result)
}

fn extract_vars_from_stmt(stmt: &Stmt, result: &mut HashMap<String, Value>) {
    match stmt {
        Stmt::Decl(Decl::Var(var_decl)) => {
            for decl in &var_decl.decls {
                let (Pat::Ident(ident), Some(init)) = (&decl.name, &decl.init) else {
                    continue;
                };
                if let Some(value) = expr_to_json(init) {
                    result.insert(ident.sym.as_str().to_string(), value);
                }
            }
        }
        Stmt::Expr(expr_stmt) => {
            let Expr::Assign(assign) = &*expr_stmt.expr else {
                return;
            };

            let name = match &assign.left {
                AssignTarget::Simple(SimpleAssignTarget::Ident(ident)) => {
                    Some(ident.sym.as_str().to_string())
                }
                AssignTarget::Simple(SimpleAssignTarget::Member(member)) => match &member.prop {
                    MemberProp::Ident(prop) => Some(prop.sym.as_str().to_string()),
                    _ => None,
                },
                _ => None,
            };

            if let (Some(name), Some(value)) = (name, expr_to_json(&assign.right)) {
                result.insert(name, value);
            }
        }
        _ => {}
    }
}

/// Literal JavaScript expression as JSON; anything computed is `None`.
fn expr_to_json(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Lit(Lit::Str(s)) => Some(Value::String(s.value.as_str().unwrap_or("").to_string())),
        Expr::Lit(Lit::Num(n)) => number_to_json(n.value),
        Expr::Lit(Lit::Bool(b)) => Some(Value::Bool(b.value)),
        Expr::Lit(Lit::Null(_)) => Some(Value::Null),

        Expr::Object(obj) => {
            let mut map = serde_json::Map::new();
            for prop in &obj.props {
                if let PropOrSpread::Prop(prop) = prop {
                    if let Prop::KeyValue(kv) = &**prop {
                        let key = prop_name_to_string(&kv.key)?;
                        map.insert(key, expr_to_json(&kv.value).unwrap_or(Value::Null));
                    }
                }
            }
            Some(Value::Object(map))
        }

        Expr::Array(arr) => Some(Value::Array(
            arr.elems
                .iter()
                .map(|elem| match elem {
                    Some(ExprOrSpread { expr, .. }) => expr_to_json(expr).unwrap_or(Value::Null),
                    None => Value::Null,
                })
                .collect(),
        )),

        // JSON.parse('...')
        Expr::Call(call) if is_json_parse_call(call) => {
            let ExprOrSpread { expr: arg, .. } = call.args.first()?;
            match &**arg {
                Expr::Lit(Lit::Str(s)) => serde_json::from_str(s.value.as_str()?).ok(),
                _ => None,
            }
        }

        Expr::Unary(unary) if unary.op == UnaryOp::Minus => match &*unary.arg {
            Expr::Lit(Lit::Num(n)) => number_to_json(-n.value),
            _ => None,
        },

        Expr::Paren(paren) => expr_to_json(&paren.expr),

        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .map(|quasi| Value::String(quasi.raw.as_str().to_string())),

        _ => None,
    }
}

fn number_to_json(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(Value::Number(serde_json::Number::from(n as i64)))
    } else {
        serde_json::Number::from_f64(n).map(Value::Number)
    }
}

fn is_json_parse_call(call: &CallExpr) -> bool {
    let Callee::Expr(expr) = &call.callee else {
        return false;
    };
    let Expr::Member(member) = &**expr else {
        return false;
    };

    matches!(&*member.obj, Expr::Ident(obj) if obj.sym.as_ref() == "JSON")
        && matches!(&member.prop, MemberProp::Ident(prop) if prop.sym.as_ref() == "parse")
}

fn prop_name_to_string(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.as_str().to_string()),
        PropName::Str(s) => s.value.as_str().map(|v| v.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}
