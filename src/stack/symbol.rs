//! Demangled symbol path parsing.
//!
//! Splits a demangled Rust symbol such as
//! `<tracing_subscriber::layer::Layered<L,S> as tracing_core::Subscriber>::event`
//! into the crate, module path, declaring type and function name the enricher
//! projects. Closure segments fold into their enclosing function and are
//! remembered in [`SymbolPath::in_closure`].

/// Identifying parts of one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolPath {
    pub crate_name: Option<String>,
    pub module_path: Option<String>,
    pub declaring_type: Option<String>,
    pub method_name: Option<String>,
    /// The frame runs a closure defined inside `method_name`.
    pub in_closure: bool,
}

impl SymbolPath {
    pub fn parse(symbol: &str) -> SymbolPath {
        let trimmed = strip_hash(symbol.trim());
        let all = split_top_level(trimmed);
        let in_closure = all.iter().any(|s| s.starts_with('{'));
        let mut segments: Vec<&str> = all
            .into_iter()
            .filter(|s| !s.is_empty() && !s.starts_with('{'))
            .collect();

        let Some(method) = segments.pop() else {
            return SymbolPath::default();
        };
        let method_name = Some(strip_generics(method).to_string()).filter(|m| !m.is_empty());

        // `<Type as Trait>::method` or `<Type>::method`: the owner is the self type.
        let owner: Vec<String> = match segments.first() {
            Some(first) if first.starts_with('<') && segments.len() == 1 => {
                let self_ty = qualified_self_type(first);
                split_top_level(&self_ty)
                    .into_iter()
                    .map(|s| strip_generics(s).to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }
            _ => segments
                .iter()
                .map(|s| strip_generics(s).to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        if owner.is_empty() {
            return SymbolPath {
                method_name,
                in_closure,
                ..SymbolPath::default()
            };
        }

        let crate_name = owner
            .first()
            .filter(|c| is_path_ident(c))
            .cloned();
        let module_segments: Vec<&str> = owner
            .iter()
            .map(String::as_str)
            .take_while(|s| is_module_segment(s))
            .collect();
        let module_path = if module_segments.is_empty() {
            None
        } else {
            Some(module_segments.join("::"))
        };

        SymbolPath {
            crate_name,
            module_path,
            declaring_type: Some(owner.join("::")),
            method_name,
            in_closure,
        }
    }
}

/// Normalize a type path the way frames are normalized: generic arguments,
/// references and raw-pointer sigils are removed.
pub fn normalize_type_path(path: &str) -> String {
    let mut ty = path.trim();
    loop {
        let next = ty
            .strip_prefix("&mut ")
            .or_else(|| ty.strip_prefix('&'))
            .or_else(|| ty.strip_prefix("*const "))
            .or_else(|| ty.strip_prefix("*mut "))
            .or_else(|| ty.strip_prefix("dyn "))
            .map(str::trim_start);
        match next {
            Some(rest) => ty = rest,
            None => break,
        }
    }
    if ty.starts_with('<') && ty.ends_with('>') {
        return qualified_self_type(ty);
    }
    split_top_level(ty)
        .into_iter()
        .map(strip_generics)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("::")
}

/// Drop the trailing `::h0123456789abcdef` hash of legacy-mangled symbols.
fn strip_hash(symbol: &str) -> &str {
    if let Some(idx) = symbol.rfind("::h") {
        let hash = &symbol[idx + 3..];
        if hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return &symbol[..idx];
        }
    }
    symbol
}

/// Split on `::` outside of angle brackets, parentheses and square brackets.
fn split_top_level(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' | b')' | b']' => depth -= 1,
            b':' if depth == 0 && i + 1 < bytes.len() && bytes[i + 1] == b':' => {
                parts.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&path[start..]);
    parts
}

/// Self type of a qualified path segment: `<A as B>` yields `A`, `<A>` yields `A`.
fn qualified_self_type(segment: &str) -> String {
    let inner = segment
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(segment);
    let bytes = inner.as_bytes();
    let mut depth: i32 = 0;
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' | b')' | b']' => depth -= 1,
            b' ' if depth == 0 && inner[i..].starts_with(" as ") => {
                return normalize_type_path(&inner[..i]);
            }
            _ => {}
        }
    }
    normalize_type_path(inner)
}

fn strip_generics(segment: &str) -> &str {
    match segment.find('<') {
        Some(0) => segment,
        Some(idx) => &segment[..idx],
        None => segment,
    }
}

fn is_path_ident(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
}

/// Module segments are lowercase identifiers; types start uppercase.
fn is_module_segment(segment: &str) -> bool {
    is_path_ident(segment)
        && segment
            .chars()
            .next()
            .map(|c| c.is_lowercase() || c == '_')
            .unwrap_or(false)
}
