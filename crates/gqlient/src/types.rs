use serde::{
    Deserialize, Serialize,
    de::{self, Deserializer, IgnoredAny, MapAccess, Visitor},
};
use std::fmt;
use std::marker::PhantomData;

pub type JsonMap = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl From<String> for Id {
    fn from(value: String) -> Id {
        Id(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque, server-issued pagination token
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl From<String> for Cursor {
    fn from(value: String) -> Cursor {
        Cursor(value)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Cursor {
        Cursor(value.to_owned())
    }
}

impl From<Cursor> for serde_json::Value {
    fn from(value: Cursor) -> serde_json::Value {
        value.0.into()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A page of items from a GraphQL connection along with the connection's
/// pagination metadata
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(from = "Connection<T>")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub start_cursor: Option<Cursor>,
    pub end_cursor: Option<Cursor>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub total_count: u64,
}

impl<T> From<Connection<T>> for Page<T> {
    fn from(value: Connection<T>) -> Page<T> {
        Page {
            items: value.nodes,
            start_cursor: value.page_info.start_cursor,
            end_cursor: value.page_info.end_cursor,
            has_next_page: value.page_info.has_next_page,
            has_previous_page: value.page_info.has_previous_page,
            total_count: value.total_count,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    nodes: Vec<T>,
    page_info: PageInfo,
    total_count: u64,
}

// Every field must be present; the cursors may be `null` on an empty page.
// (`deserialize_with` keeps serde from treating a missing cursor as `null`.)
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(deserialize_with = "Option::deserialize")]
    start_cursor: Option<Cursor>,
    #[serde(deserialize_with = "Option::deserialize")]
    end_cursor: Option<Cursor>,
    has_next_page: bool,
    has_previous_page: bool,
}

// Utility type for use in deserializing just `foo` from a map of the form
// `{"anything": foo}`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Singleton<T>(pub T);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Singleton<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SingletonVisitor::new())
    }
}

struct SingletonVisitor<T>(PhantomData<T>);

impl<T> SingletonVisitor<T> {
    fn new() -> Self {
        SingletonVisitor(PhantomData)
    }
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for SingletonVisitor<T> {
    type Value = Singleton<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string-keyed map containing a single field")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        if let Some((_, value)) = map.next_entry::<String, T>()? {
            if map.next_entry::<String, IgnoredAny>()?.is_some() {
                Err(de::Error::invalid_length(
                    map.size_hint().unwrap_or(0).saturating_add(2),
                    &self,
                ))
            } else {
                Ok(Singleton(value))
            }
        } else {
            Err(de::Error::invalid_length(0, &self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn page_from_connection() {
        let page = serde_json::from_value::<Page<Singleton<String>>>(json!({
            "nodes": [{"name": "foo"}, {"name": "bar"}],
            "pageInfo": {
                "startCursor": "c1",
                "endCursor": "c2",
                "hasNextPage": true,
                "hasPreviousPage": false
            },
            "totalCount": 17
        }))
        .unwrap();
        assert_eq!(
            page,
            Page {
                items: vec![
                    Singleton(String::from("foo")),
                    Singleton(String::from("bar"))
                ],
                start_cursor: Some(Cursor::from("c1")),
                end_cursor: Some(Cursor::from("c2")),
                has_next_page: true,
                has_previous_page: false,
                total_count: 17,
            }
        );
    }

    #[test]
    fn empty_page_has_null_cursors() {
        let page = serde_json::from_value::<Page<u32>>(json!({
            "nodes": [],
            "pageInfo": {
                "startCursor": null,
                "endCursor": null,
                "hasNextPage": false,
                "hasPreviousPage": false
            },
            "totalCount": 0
        }))
        .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.start_cursor, None);
        assert_eq!(page.end_cursor, None);
    }

    #[test]
    fn incomplete_page_info() {
        for page_info in [
            json!({"startCursor": null, "endCursor": null, "hasNextPage": false}),
            json!({"endCursor": null, "hasNextPage": false, "hasPreviousPage": false}),
            json!({"startCursor": null, "hasNextPage": false, "hasPreviousPage": false}),
        ] {
            let r = serde_json::from_value::<Page<u32>>(json!({
                "nodes": [],
                "pageInfo": page_info,
                "totalCount": 0
            }));
            assert!(r.is_err(), "accepted pageInfo {page_info}");
        }
    }

    #[test]
    fn missing_total_count() {
        let r = serde_json::from_value::<Page<u32>>(json!({
            "nodes": [],
            "pageInfo": {
                "startCursor": null,
                "endCursor": null,
                "hasNextPage": false,
                "hasPreviousPage": false
            }
        }));
        assert!(r.is_err());
    }

    #[test]
    fn singleton_rejects_extra_fields() {
        let r = serde_json::from_value::<Singleton<u32>>(json!({"a": 1, "b": 2}));
        assert!(r.is_err());
        let r = serde_json::from_value::<Singleton<u32>>(json!({}));
        assert!(r.is_err());
    }
}
