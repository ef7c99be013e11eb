//! Domain object to REST conversion
//!
//! Each domain type has a camelCase REST model. `ConverterService` wraps a
//! model into a [`HalResource`] carrying its `type` and `self` link, and
//! renders pages in the HAL page layout.

pub mod config;
pub mod content;
pub mod eperson;
pub mod license;
pub mod system;
pub mod workflow;

use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};

use crate::{
    models::DSpaceObject,
    repository::{Page, Pageable},
    Error, Result,
};

/// A REST model with its registry coordinates.
pub trait RestModel: Serialize + Send + Sync {
    const CATEGORY: &'static str;
    const TYPE: &'static str;
    const PLURAL: &'static str;

    fn rest_id(&self) -> String;
}

pub trait ToRest {
    type Rest: RestModel;

    fn to_rest(&self) -> Self::Rest;
}

/// A converted resource, before serialization.
#[derive(Debug, Clone)]
pub struct HalResource {
    category: &'static str,
    model: &'static str,
    type_name: &'static str,
    id: String,
    self_href: String,
    body: Map<String, JsonValue>,
    links: Map<String, JsonValue>,
    embedded: Map<String, JsonValue>,
}

impl HalResource {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn self_href(&self) -> &str {
        &self.self_href
    }

    pub fn add_link(&mut self, rel: &str, href: impl Into<String>) {
        self.links
            .insert(rel.to_string(), json!({ "href": href.into() }));
    }

    pub fn embed(&mut self, rel: &str, value: JsonValue) {
        self.embedded.insert(rel.to_string(), value);
    }

    pub fn into_json(self) -> JsonValue {
        let mut out = self.body;
        out.insert("type".to_string(), JsonValue::String(self.type_name.to_string()));

        let mut links = Map::new();
        links.insert("self".to_string(), json!({ "href": self.self_href }));
        links.extend(self.links);
        out.insert("_links".to_string(), JsonValue::Object(links));

        if !self.embedded.is_empty() {
            out.insert("_embedded".to_string(), JsonValue::Object(self.embedded));
        }
        JsonValue::Object(out)
    }
}

#[derive(Debug, Clone)]
pub struct ConverterService {
    base_url: String,
}

impl ConverterService {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}/api", self.base_url)
    }

    pub fn collection_href(&self, category: &str, model: &str) -> String {
        format!("{}/api/{category}/{model}", self.base_url)
    }

    pub fn entity_href(&self, category: &str, model: &str, id: &str) -> String {
        format!("{}/api/{category}/{model}/{id}", self.base_url)
    }

    pub fn to_rest<T: ToRest>(&self, object: &T) -> Result<HalResource> {
        let rest = object.to_rest();
        let id = rest.rest_id();
        let body = match serde_json::to_value(&rest) {
            Ok(JsonValue::Object(map)) => map,
            Ok(_) => {
                return Err(Error::Internal(format!(
                    "{} did not serialize to an object",
                    <T::Rest as RestModel>::TYPE
                )))
            }
            Err(e) => return Err(Error::Internal(e.to_string())),
        };

        let category = <T::Rest as RestModel>::CATEGORY;
        let model = <T::Rest as RestModel>::PLURAL;
        Ok(HalResource {
            category,
            model,
            type_name: <T::Rest as RestModel>::TYPE,
            self_href: self.entity_href(category, model, &id),
            id,
            body,
            links: Map::new(),
            embedded: Map::new(),
        })
    }

    pub fn dso_to_rest(&self, object: &DSpaceObject) -> Result<HalResource> {
        match object {
            DSpaceObject::Community(c) => self.to_rest(c),
            DSpaceObject::Collection(c) => self.to_rest(c),
            DSpaceObject::Item(i) => self.to_rest(i),
            DSpaceObject::Bundle(b) => self.to_rest(b),
            DSpaceObject::Bitstream(b) => self.to_rest(b),
        }
    }

    /// Convert one page of store results; `total` is the size of the whole
    /// result set.
    pub fn to_rest_page<T: ToRest>(
        &self,
        objects: &[T],
        pageable: Pageable,
        total: u64,
    ) -> Result<Page<HalResource>> {
        let content = objects
            .iter()
            .map(|o| self.to_rest(o))
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(content, pageable, total))
    }

    /// Page over a list already held in memory.
    pub fn to_rest_page_in_memory<T: ToRest>(
        &self,
        objects: &[T],
        pageable: Pageable,
    ) -> Result<Page<HalResource>> {
        let window = pageable.window();
        let start = (window.offset as usize).min(objects.len());
        let end = window
            .limit
            .map_or(objects.len(), |l| start.saturating_add(l as usize).min(objects.len()));
        self.to_rest_page(&objects[start..end], pageable, objects.len() as u64)
    }

    /// HAL page JSON with rendered elements under `_embedded.{key}`.
    pub fn page_json(
        &self,
        content: Vec<JsonValue>,
        pageable: Pageable,
        total: u64,
        key: &str,
        href: &str,
    ) -> JsonValue {
        let total_pages = pageable.total_pages(total);
        let page_href = |number: u64| format!("{href}?page={number}&size={}", pageable.size);

        let mut links = Map::new();
        links.insert("self".to_string(), json!({ "href": href }));
        if total_pages > 0 {
            links.insert("first".to_string(), json!({ "href": page_href(0) }));
            if pageable.page > 0 {
                let prev = pageable.page.min(total_pages) - 1;
                links.insert("prev".to_string(), json!({ "href": page_href(prev) }));
            }
            if let Some(next) = pageable.page.checked_add(1).filter(|n| *n < total_pages) {
                links.insert("next".to_string(), json!({ "href": page_href(next) }));
            }
            links.insert("last".to_string(), json!({ "href": page_href(total_pages - 1) }));
        }

        let mut embedded = Map::new();
        embedded.insert(key.to_string(), JsonValue::Array(content));

        json!({
            "_embedded": embedded,
            "_links": links,
            "page": {
                "size": pageable.size,
                "totalElements": total,
                "totalPages": total_pages,
                "number": pageable.page,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Community;
    use uuid::Uuid;

    fn community(name: &str) -> Community {
        Community {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            handle: None,
            short_description: None,
            parent_community_id: None,
            last_modified: None,
        }
    }

    #[test]
    fn resource_carries_type_and_self_link() {
        let converter = ConverterService::new("http://localhost:8080/");
        let c = community("Sciences");
        let json = converter.to_rest(&c).unwrap().into_json();

        assert_eq!(json["id"], c.uuid.to_string());
        assert_eq!(json["type"], "community");
        assert_eq!(
            json["_links"]["self"]["href"],
            format!("http://localhost:8080/api/core/communities/{}", c.uuid)
        );
        assert!(json.get("_embedded").is_none());
    }

    #[test]
    fn in_memory_page_reports_full_total() {
        let converter = ConverterService::new("http://localhost:8080");
        let all: Vec<_> = ["a", "b", "c", "d", "e"].into_iter().map(community).collect();

        let page = converter
            .to_rest_page_in_memory(&all, Pageable::new(1, 2))
            .unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.content[0].id(), all[2].uuid.to_string());

        let beyond = converter
            .to_rest_page_in_memory(&all, Pageable::new(9, 2))
            .unwrap();
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[test]
    fn page_json_links_neighbours() {
        let converter = ConverterService::new("http://x");
        let json = converter.page_json(Vec::new(), Pageable::new(1, 2), 5, "items", "http://x/api/core/items");

        assert_eq!(json["page"]["totalPages"], 3);
        assert_eq!(json["page"]["totalElements"], 5);
        assert_eq!(json["_links"]["prev"]["href"], "http://x/api/core/items?page=0&size=2");
        assert_eq!(json["_links"]["next"]["href"], "http://x/api/core/items?page=2&size=2");
        assert_eq!(json["_links"]["last"]["href"], "http://x/api/core/items?page=2&size=2");
        assert!(json["_embedded"]["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn page_json_at_last_representable_page_has_no_next() {
        let converter = ConverterService::new("http://x");
        let json = converter.page_json(
            Vec::new(),
            Pageable::new(u64::MAX, 1),
            3,
            "items",
            "http://x/api/core/items",
        );

        assert_eq!(json["page"]["number"], u64::MAX);
        assert!(json["_links"].get("next").is_none());
        assert_eq!(json["_links"]["prev"]["href"], "http://x/api/core/items?page=2&size=1");
        assert_eq!(json["_links"]["last"]["href"], "http://x/api/core/items?page=2&size=1");
    }
}
