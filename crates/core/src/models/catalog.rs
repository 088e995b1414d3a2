//! Catalog structure: attributes, categories, subcategories, brands.

use serde::{Deserialize, Serialize};

use crate::types::{AttributeId, AttributeValueId, BrandId, CategoryId, SubcategoryId};

/// A product attribute such as "Color" or "Size".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
    #[serde(default)]
    pub status: bool,
    /// Values, when the backend joins them in.
    #[serde(default)]
    pub values: Vec<AttributeValue>,
}

/// One allowed value of an [`Attribute`], e.g. "Red".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub id: AttributeValueId,
    #[serde(alias = "attributeId")]
    pub attribute_id: AttributeId,
    pub value: String,
    #[serde(default)]
    pub status: bool,
}

/// Top-level product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Media path relative to the upload host.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: bool,
}

/// Second-level category with the attributes its products use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    #[serde(alias = "categoryId")]
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_subcategory_with_joined_attributes() {
        let json = r#"{
            "id": 3,
            "categoryId": 1,
            "name": "Sneakers",
            "status": true,
            "attributes": [{"id": 7, "name": "Color", "status": true}]
        }"#;
        let sub: Subcategory = serde_json::from_str(json).unwrap();
        assert_eq!(sub.category_id, CategoryId::new(1));
        assert_eq!(sub.attributes.len(), 1);
        assert!(sub.attributes[0].values.is_empty());
        assert!(sub.image.is_none());
    }

    #[test]
    fn test_missing_status_defaults_to_inactive() {
        let value: AttributeValue =
            serde_json::from_str(r#"{"id": 1, "attribute_id": 7, "value": "Red"}"#).unwrap();
        assert!(!value.status);
    }
}
