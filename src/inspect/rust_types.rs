use crate::model::FieldInfo;

/// Semantic shape of a Rust field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    pub tag: String,
    pub nested: Option<String>,
    pub optional: bool,
}

/// Map a Rust type expression onto a semantic type tag.
///
/// `Option<T>` marks the field optional; `Vec<T>` and set types become
/// `array[..]`; maps and `serde_json::Value` become plain `object`; any other
/// named type is an `object` nesting that type.
pub fn shape_of(ty: &str) -> TypeShape {
    let ty = compact(ty);
    if let Some(inner) = generic_arg(&ty, &["Option"]) {
        let mut shape = shape_of(inner);
        shape.optional = true;
        return shape;
    }
    if let Some(inner) = generic_arg(&ty, &["Box", "Arc", "Rc"]) {
        return shape_of(inner);
    }
    if let Some(inner) = generic_arg(&ty, &["Vec", "HashSet", "BTreeSet", "VecDeque"]) {
        let item = shape_of(inner);
        let item_tag = match (&item.nested, item.tag.as_str()) {
            (Some(name), _) => name.clone(),
            (None, tag) => tag.to_string(),
        };
        return TypeShape {
            tag: format!("array[{item_tag}]"),
            nested: None,
            optional: false,
        };
    }

    let name = last_segment(&ty);
    let tag = match name {
        "String" | "str" | "&str" | "Cow" | "char" | "Uuid" | "DateTime" | "NaiveDate"
        | "NaiveDateTime" | "NaiveTime" | "Url" | "PathBuf" => "string",
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => "integer",
        "f32" | "f64" | "Decimal" => "number",
        "bool" => "boolean",
        "HashMap" | "BTreeMap" | "IndexMap" | "Value" | "Map" => "object",
        other => {
            return TypeShape {
                tag: "object".to_string(),
                nested: Some(other.to_string()),
                optional: false,
            }
        }
    };
    TypeShape {
        tag: tag.to_string(),
        nested: None,
        optional: false,
    }
}

/// Build a field from its wire name and Rust type
pub fn field_for(name: &str, ty: &str, has_default: bool) -> FieldInfo {
    let shape = shape_of(ty);
    let mut field = FieldInfo::new(name, shape.tag, !shape.optional && !has_default);
    field.nested_schema = shape.nested;
    field
}

/// Drop whitespace and lifetimes: `&'a str` → `&str`
fn compact(ty: &str) -> String {
    let mut out = String::with_capacity(ty.len());
    let mut chars = ty.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\'' {
            while chars.next_if(|c| c.is_alphanumeric() || *c == '_').is_some() {}
        } else if !ch.is_whitespace() {
            out.push(ch);
        }
    }
    out
}

/// Inner type of `Wrapper<Inner>` when the outer name is one of `wrappers`
fn generic_arg<'a>(ty: &'a str, wrappers: &[&str]) -> Option<&'a str> {
    let open = ty.find('<')?;
    let outer = last_segment(&ty[..open]);
    if !wrappers.contains(&outer) || !ty.ends_with('>') {
        return None;
    }
    ty.get(open + 1..ty.len() - 1)
}

/// Last path segment without generics or references: `&chrono::DateTime<Utc>` → `DateTime`
fn last_segment(ty: &str) -> &str {
    let base = ty.split('<').next().unwrap_or(ty);
    let base = base.rsplit("::").next().unwrap_or(base);
    base.trim_start_matches('&')
}

/// Convert a snake_case field name to camelCase for `rename_all = "camelCase"`
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
