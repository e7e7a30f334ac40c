//! Product aggregate and its image attachment.
//!
//! A product belongs to exactly one owner for its whole lifetime. Only the
//! owner may read, change, or delete it; the owner id is set at creation and
//! no operation rewrites it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Error, UserId};

/// Store-assigned product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Allocate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read from storage or a request path.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Attributes a client may submit for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    /// Display name.
    Name,
    /// Stock-keeping unit, fixed at creation.
    Sku,
    /// Free-text grouping.
    Category,
    /// Units in stock.
    Quantity,
    /// Unit price.
    Price,
    /// Long-form description.
    Description,
}

impl ProductField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Sku => "sku",
            Self::Category => "category",
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for product input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    /// Required fields were absent or blank.
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<ProductField>),
    /// A submitted text field was blank.
    #[error("{0} must not be empty")]
    BlankField(ProductField),
    /// A numeric field carried text that is not a number.
    #[error("{0} must be a number")]
    InvalidNumber(ProductField),
    /// The price was NaN or infinite.
    #[error("price must be a finite number")]
    NonFinitePrice,
    /// The upload's declared MIME type is not an accepted image type.
    #[error("unsupported image type {}", .0.as_deref().unwrap_or("(none)"))]
    UnsupportedImageType(Option<String>),
}

/// MIME types accepted for product images.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpg", "image/jpeg"];

/// Reject uploads whose declared MIME type is not an accepted image type.
///
/// # Examples
/// ```
/// use inventory_backend::domain::ensure_image_type;
///
/// assert!(ensure_image_type("image/png").is_ok());
/// assert!(ensure_image_type("image/gif").is_err());
/// ```
pub fn ensure_image_type(content_type: &str) -> Result<(), ProductValidationError> {
    if ACCEPTED_IMAGE_TYPES.contains(&content_type) {
        Ok(())
    } else {
        let declared = Some(content_type.to_owned()).filter(|mime| !mime.is_empty());
        Err(ProductValidationError::UnsupportedImageType(declared))
    }
}

fn join_fields(fields: &[ProductField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Product attributes as submitted; every field may be absent.
///
/// Numbers stay as the submitted text so they are only judged once the
/// target product has been found and its owner checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFields {
    /// Submitted name.
    pub name: Option<String>,
    /// Submitted SKU; ignored on update.
    pub sku: Option<String>,
    /// Submitted category.
    pub category: Option<String>,
    /// Quantity text, parsed as a whole number.
    pub quantity: Option<String>,
    /// Price text, parsed as a finite decimal.
    pub price: Option<String>,
    /// Submitted description.
    pub description: Option<String>,
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}

/// Blank numeric text counts as absent.
fn numeric_text(value: Option<&String>) -> Option<&str> {
    value.map(|text| text.trim()).filter(|text| !text.is_empty())
}

fn parse_quantity(value: Option<&String>) -> Result<Option<i64>, ProductValidationError> {
    numeric_text(value)
        .map(|text| {
            text.parse::<i64>()
                .map_err(|_| ProductValidationError::InvalidNumber(ProductField::Quantity))
        })
        .transpose()
}

fn parse_price(value: Option<&String>) -> Result<Option<f64>, ProductValidationError> {
    numeric_text(value)
        .map(|text| match text.parse::<f64>() {
            Ok(price) if price.is_finite() => Ok(price),
            _ => Err(ProductValidationError::InvalidNumber(ProductField::Price)),
        })
        .transpose()
}

impl ProductFields {
    /// Fields that are missing or blank for a create request, in form order.
    pub fn missing_for_create(&self) -> Vec<ProductField> {
        let mut missing = Vec::new();
        if is_blank(self.name.as_ref()) {
            missing.push(ProductField::Name);
        }
        if is_blank(self.sku.as_ref()) {
            missing.push(ProductField::Sku);
        }
        if is_blank(self.category.as_ref()) {
            missing.push(ProductField::Category);
        }
        if numeric_text(self.quantity.as_ref()).is_none() {
            missing.push(ProductField::Quantity);
        }
        if numeric_text(self.price.as_ref()).is_none() {
            missing.push(ProductField::Price);
        }
        if is_blank(self.description.as_ref()) {
            missing.push(ProductField::Description);
        }
        missing
    }
}

/// Fully populated attributes for a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    /// Display name.
    pub name: String,
    /// Stock-keeping unit.
    pub sku: String,
    /// Free-text grouping.
    pub category: String,
    /// Units in stock.
    pub quantity: i64,
    /// Unit price.
    pub price: f64,
    /// Long-form description.
    pub description: String,
}

impl ProductDetails {
    fn validate(&self) -> Result<(), ProductValidationError> {
        let missing: Vec<ProductField> = [
            (ProductField::Name, &self.name),
            (ProductField::Sku, &self.sku),
            (ProductField::Category, &self.category),
            (ProductField::Description, &self.description),
        ]
        .into_iter()
        .filter(|(_, text)| text.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(ProductValidationError::MissingFields(missing));
        }
        if !self.price.is_finite() {
            return Err(ProductValidationError::NonFinitePrice);
        }
        Ok(())
    }
}

impl TryFrom<ProductFields> for ProductDetails {
    type Error = ProductValidationError;

    /// Missing fields are reported before malformed numbers.
    fn try_from(fields: ProductFields) -> Result<Self, Self::Error> {
        let missing = fields.missing_for_create();
        if !missing.is_empty() {
            return Err(ProductValidationError::MissingFields(missing));
        }
        let quantity = parse_quantity(fields.quantity.as_ref())?;
        let price = parse_price(fields.price.as_ref())?;
        let (
            ProductFields {
                name: Some(name),
                sku: Some(sku),
                category: Some(category),
                description: Some(description),
                ..
            },
            Some(quantity),
            Some(price),
        ) = (fields, quantity, price)
        else {
            return Err(ProductValidationError::MissingFields(missing));
        };
        Ok(Self {
            name,
            sku,
            category,
            quantity,
            price,
            description,
        })
    }
}

/// Replacement values for an update; absent fields keep their stored value.
///
/// The SKU is fixed at creation and has no slot here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New quantity.
    pub quantity: Option<i64>,
    /// New price.
    pub price: Option<f64>,
    /// New description.
    pub description: Option<String>,
}

impl TryFrom<ProductFields> for ProductChanges {
    type Error = ProductValidationError;

    fn try_from(fields: ProductFields) -> Result<Self, Self::Error> {
        let ProductFields {
            name,
            sku: _,
            category,
            quantity,
            price,
            description,
        } = fields;
        for (field, value) in [
            (ProductField::Name, &name),
            (ProductField::Category, &category),
            (ProductField::Description, &description),
        ] {
            if value.as_ref().is_some_and(|text| text.trim().is_empty()) {
                return Err(ProductValidationError::BlankField(field));
            }
        }
        Ok(Self {
            name,
            category,
            quantity: parse_quantity(quantity.as_ref())?,
            price: parse_price(price.as_ref())?,
            description,
        })
    }
}

/// Metadata for an image stored on the image host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Original upload file name.
    pub file_name: String,
    /// Durable URL returned by the image host.
    pub file_path: String,
    /// MIME type reported by the client.
    pub file_type: String,
    /// Human-readable size, e.g. `1.5 KB`.
    pub file_size: String,
}

/// Optional image attachment.
///
/// `Empty` serialises as `{}` so clients detect "no image" by the absence of
/// keys rather than by a `null`.
///
/// # Examples
/// ```
/// use inventory_backend::domain::ImageAttachment;
///
/// let json = serde_json::to_string(&ImageAttachment::Empty).expect("serialise");
/// assert_eq!(json, "{}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageAttachment {
    /// No image has been uploaded.
    #[default]
    Empty,
    /// The product carries this image.
    Attached(ProductImage),
}

impl ImageAttachment {
    /// Borrow the image when one is attached.
    pub fn image(&self) -> Option<&ProductImage> {
        match self {
            Self::Empty => None,
            Self::Attached(image) => Some(image),
        }
    }

    /// Whether no image is attached.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Option<ProductImage>> for ImageAttachment {
    fn from(value: Option<ProductImage>) -> Self {
        value.map_or(Self::Empty, Self::Attached)
    }
}

impl Serialize for ImageAttachment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_map(Some(0))?.end(),
            Self::Attached(image) => image.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentFields {
    file_name: Option<String>,
    file_path: Option<String>,
    file_type: Option<String>,
    file_size: Option<String>,
}

impl<'de> Deserialize<'de> for ImageAttachment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Some(fields) = Option::<AttachmentFields>::deserialize(deserializer)? else {
            return Ok(Self::Empty);
        };
        match fields {
            AttachmentFields {
                file_name: None,
                file_path: None,
                file_type: None,
                file_size: None,
            } => Ok(Self::Empty),
            AttachmentFields {
                file_name: Some(file_name),
                file_path: Some(file_path),
                file_type: Some(file_type),
                file_size: Some(file_size),
            } => Ok(Self::Attached(ProductImage {
                file_name,
                file_path,
                file_type,
                file_size,
            })),
            _ => Err(serde::de::Error::custom(
                "image attachment must carry all four fields or none",
            )),
        }
    }
}

/// Input for [`Product::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    /// Identifier for the new product.
    pub id: ProductId,
    /// Creating user.
    pub owner_id: UserId,
    /// Validated attributes.
    pub details: ProductDetails,
    /// Image attached at creation, if any.
    pub image: ImageAttachment,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Inventory product owned by a single user.
///
/// ## Invariants
/// - `name`, `sku`, `category`, and `description` are non-blank.
/// - `price` is finite.
/// - `owner_id`, `id`, `sku`, and `created_at` never change after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    owner_id: UserId,
    details: ProductDetails,
    image: ImageAttachment,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Validate a draft into a product.
    pub fn new(draft: ProductDraft) -> Result<Self, ProductValidationError> {
        let ProductDraft {
            id,
            owner_id,
            details,
            image,
            created_at,
            updated_at,
        } = draft;
        details.validate()?;
        Ok(Self {
            id,
            owner_id,
            details,
            image,
            created_at,
            updated_at,
        })
    }

    /// Product identifier.
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// User that created the product.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.details.name
    }

    /// Stock-keeping unit.
    pub fn sku(&self) -> &str {
        &self.details.sku
    }

    /// Free-text grouping.
    pub fn category(&self) -> &str {
        &self.details.category
    }

    /// Units in stock.
    pub fn quantity(&self) -> i64 {
        self.details.quantity
    }

    /// Unit price.
    pub fn price(&self) -> f64 {
        self.details.price
    }

    /// Long-form description.
    pub fn description(&self) -> &str {
        &self.details.description
    }

    /// Image attachment, possibly empty.
    pub fn image(&self) -> &ImageAttachment {
        &self.image
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last successful update.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` created this product.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    /// Fail with `401 User not authorized` unless `user` owns the product.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use inventory_backend::domain::{
    ///     ErrorCode, ImageAttachment, Product, ProductDetails, ProductDraft, ProductId, UserId,
    /// };
    ///
    /// let owner = UserId::random();
    /// let now = Utc::now();
    /// let product = Product::new(ProductDraft {
    ///     id: ProductId::random(),
    ///     owner_id: owner,
    ///     details: ProductDetails {
    ///         name: "Widget".into(),
    ///         sku: "W1".into(),
    ///         category: "Tools".into(),
    ///         quantity: 5,
    ///         price: 9.99,
    ///         description: "desc".into(),
    ///     },
    ///     image: ImageAttachment::Empty,
    ///     created_at: now,
    ///     updated_at: now,
    /// })
    /// .expect("valid product");
    ///
    /// assert!(product.ensure_owned_by(&owner).is_ok());
    /// let err = product.ensure_owned_by(&UserId::random()).expect_err("stranger");
    /// assert_eq!(err.code(), ErrorCode::Unauthorized);
    /// ```
    pub fn ensure_owned_by(&self, user: &UserId) -> Result<(), Error> {
        if self.is_owned_by(user) {
            Ok(())
        } else {
            Err(Error::unauthorized("User not authorized"))
        }
    }

    /// Apply validated changes.
    ///
    /// Present fields replace stored values, absent fields are kept, and the
    /// image is replaced only when `image` is `Some`.
    pub fn apply(
        mut self,
        changes: ProductChanges,
        image: Option<ProductImage>,
        now: DateTime<Utc>,
    ) -> Self {
        let ProductChanges {
            name,
            category,
            quantity,
            price,
            description,
        } = changes;
        if let Some(name) = name {
            self.details.name = name;
        }
        if let Some(category) = category {
            self.details.category = category;
        }
        if let Some(quantity) = quantity {
            self.details.quantity = quantity;
        }
        if let Some(price) = price {
            self.details.price = price;
        }
        if let Some(description) = description {
            self.details.description = description;
        }
        if let Some(image) = image {
            self.image = ImageAttachment::Attached(image);
        }
        self.updated_at = now;
        self
    }
}

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;
