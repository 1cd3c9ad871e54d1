//! Supplier derivation from registry metadata and purls.
//!
//! Builds the CycloneDX `supplier` object: a name, an optional contact
//! list, and up to three project URLs. Maintainer data wins over author
//! data when both are present.

use serde_json::{Value, json};

use crate::registry::{PackageInfo, RegistryMetadata};

/// Maximum URLs carried in a supplier entry.
const MAX_SUPPLIER_URLS: usize = 3;

/// project_urls keys considered supplier-worthy.
const URL_KEYS: [&str; 3] = ["homepage", "repository", "source"];

/// Build a supplier object from PyPI metadata, `None` when nothing usable
/// is found.
pub fn from_pypi_metadata(meta: &RegistryMetadata) -> Option<Value> {
    let info = &meta.info;

    let name = pick(info.maintainer.as_deref(), info.author.as_deref());
    let email = pick(
        info.maintainer_email.as_deref(),
        info.author_email.as_deref(),
    );

    let mut supplier = serde_json::Map::new();

    if let Some(ref name) = name {
        supplier.insert("name".to_owned(), json!(name));
        if let Some(email) = email {
            // Contact entries without a real address are worse than none
            if email.contains('@') {
                supplier.insert(
                    "contact".to_owned(),
                    json!([{ "name": name, "email": email }]),
                );
            }
        }
    }

    let urls = collect_urls(info);
    if !urls.is_empty() {
        supplier.insert("url".to_owned(), json!(urls));
    }

    if supplier.is_empty() {
        None
    } else {
        Some(Value::Object(supplier))
    }
}

/// Static supplier for the npm registry.
pub fn npm_registry() -> Value {
    json!({ "name": "npm Registry", "url": ["https://www.npmjs.com/"] })
}

/// Static supplier for Maven Central.
pub fn maven_central() -> Value {
    json!({ "name": "Maven Central", "url": ["https://search.maven.org/"] })
}

fn pick(preferred: Option<&str>, fallback: Option<&str>) -> Option<String> {
    [preferred, fallback]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

fn collect_urls(info: &PackageInfo) -> Vec<String> {
    let mut urls = Vec::new();

    if let Some(homepage) = info.home_page.as_deref() {
        let homepage = homepage.trim();
        if homepage.starts_with("http") {
            urls.push(homepage.to_owned());
        }
    }

    if let Some(ref project_urls) = info.project_urls {
        for key in URL_KEYS {
            for (k, v) in project_urls {
                let Some(v) = v.as_str() else { continue };
                if k.to_lowercase() == key && v.starts_with("http") && !urls.contains(&v.to_owned())
                {
                    urls.push(v.to_owned());
                }
            }
        }
    }

    urls.truncate(MAX_SUPPLIER_URLS);
    urls
}
