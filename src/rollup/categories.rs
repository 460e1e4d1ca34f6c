//! Static category registry.
//!
//! One `CategoryDef` per summed product category, pairing the monthly
//! summary section key with an extract function (event record → product
//! attributes, `None` when the event has nothing for that product) and an
//! identity function (attributes → composite identity string). The registry
//! is resolved at startup; there is no runtime name-based dispatch.

use crate::types::{BladeInfo, BrushInfo, EventRecord, RazorInfo, SoapInfo};

/// Borrowed product attributes extracted from one event record.
#[derive(Debug, Clone, Copy)]
pub enum ProductRef<'a> {
    Razor(&'a RazorInfo),
    Blade(&'a BladeInfo),
    Brush(&'a BrushInfo),
    Soap(&'a SoapInfo),
}

pub type ExtractFn = fn(&EventRecord) -> Option<ProductRef<'_>>;
pub type IdentityFn = fn(ProductRef<'_>) -> Option<String>;

/// One registry entry: how a category reads its monthly rows and re-derives
/// identities from raw events.
pub struct CategoryDef {
    /// Section key in both the monthly summary and the annual document.
    pub key: &'static str,
    pub extract: ExtractFn,
    pub identity: IdentityFn,
}

impl CategoryDef {
    /// Derives this category's composite identity for one event, or `None`
    /// if the event carries no recognized attributes for it.
    pub fn event_identity(&self, event: &EventRecord) -> Option<String> {
        (self.extract)(event).and_then(self.identity)
    }
}

fn extract_razor(e: &EventRecord) -> Option<ProductRef<'_>> {
    e.razor.as_ref().map(ProductRef::Razor)
}

fn extract_blade(e: &EventRecord) -> Option<ProductRef<'_>> {
    e.blade.as_ref().map(ProductRef::Blade)
}

fn extract_brush(e: &EventRecord) -> Option<ProductRef<'_>> {
    e.brush.as_ref().map(ProductRef::Brush)
}

fn extract_soap(e: &EventRecord) -> Option<ProductRef<'_>> {
    e.soap.as_ref().map(ProductRef::Soap)
}

fn razor_name(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Razor(r) => Some(format!("{} {}", r.brand, r.model)),
        _ => None,
    }
}

fn razor_brand(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Razor(r) => Some(r.brand.clone()),
        _ => None,
    }
}

fn razor_format(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Razor(r) => r.format.clone(),
        _ => None,
    }
}

fn blade_name(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Blade(b) => Some(format!("{} {}", b.brand, b.model)),
        _ => None,
    }
}

fn blade_brand(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Blade(b) => Some(b.brand.clone()),
        _ => None,
    }
}

fn brush_name(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Brush(b) => Some(format!("{} {}", b.brand, b.model)),
        _ => None,
    }
}

fn brush_brand(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Brush(b) => Some(b.brand.clone()),
        _ => None,
    }
}

fn brush_fiber(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Brush(b) => b.fiber.clone(),
        _ => None,
    }
}

fn brush_knot_size(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Brush(b) => b.knot_size.map(|k| format!("{k}")),
        _ => None,
    }
}

fn soap_name(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Soap(s) => Some(format!("{} {}", s.maker, s.scent)),
        _ => None,
    }
}

fn soap_maker(p: ProductRef<'_>) -> Option<String> {
    match p {
        ProductRef::Soap(s) => Some(s.maker.clone()),
        _ => None,
    }
}

/// Every summed category, in annual-document section order. Attendance and
/// the peak blade-use table have their own reducers and are not listed here.
pub static CATEGORIES: &[CategoryDef] = &[
    CategoryDef { key: "razors", extract: extract_razor, identity: razor_name },
    CategoryDef { key: "razor_manufacturers", extract: extract_razor, identity: razor_brand },
    CategoryDef { key: "razor_formats", extract: extract_razor, identity: razor_format },
    CategoryDef { key: "blades", extract: extract_blade, identity: blade_name },
    CategoryDef { key: "blade_manufacturers", extract: extract_blade, identity: blade_brand },
    CategoryDef { key: "brushes", extract: extract_brush, identity: brush_name },
    CategoryDef { key: "brush_manufacturers", extract: extract_brush, identity: brush_brand },
    CategoryDef { key: "brush_fibers", extract: extract_brush, identity: brush_fiber },
    CategoryDef { key: "brush_knot_sizes", extract: extract_brush, identity: brush_knot_size },
    CategoryDef { key: "soaps", extract: extract_soap, identity: soap_name },
    CategoryDef { key: "soap_makers", extract: extract_soap, identity: soap_maker },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> EventRecord {
        EventRecord {
            author: "alice".to_string(),
            razor: Some(RazorInfo {
                brand: "Karve".to_string(),
                model: "Christopher Bradley".to_string(),
                format: Some("DE".to_string()),
            }),
            blade: None,
            brush: Some(BrushInfo {
                brand: "Simpson".to_string(),
                model: "Chubby 2".to_string(),
                fiber: None,
                knot_size: Some(27.0),
            }),
            soap: None,
        }
    }

    fn def(key: &str) -> &'static CategoryDef {
        CATEGORIES.iter().find(|d| d.key == key).unwrap()
    }

    #[test]
    fn test_registry_keys_are_unique() {
        let mut keys: Vec<_> = CATEGORIES.iter().map(|d| d.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), CATEGORIES.len());
    }

    #[test]
    fn test_composite_identities() {
        let e = event();
        assert_eq!(
            def("razors").event_identity(&e).unwrap(),
            "Karve Christopher Bradley"
        );
        assert_eq!(def("razor_manufacturers").event_identity(&e).unwrap(), "Karve");
        assert_eq!(def("razor_formats").event_identity(&e).unwrap(), "DE");
        assert_eq!(def("brushes").event_identity(&e).unwrap(), "Simpson Chubby 2");
    }

    #[test]
    fn test_absent_product_is_not_a_match() {
        let e = event();
        assert!(def("blades").event_identity(&e).is_none());
        assert!(def("soaps").event_identity(&e).is_none());
        // Brush present but fiber unset: no fiber identity either.
        assert!(def("brush_fibers").event_identity(&e).is_none());
    }

    #[test]
    fn test_knot_size_identity_is_numeric() {
        let e = event();
        let id = def("brush_knot_sizes").event_identity(&e).unwrap();
        assert_eq!(id.parse::<f64>().unwrap(), 27.0);
    }
}
