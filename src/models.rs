use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Fixed UTC timestamp for seed data.
pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(Role {
    Admin => "admin",
    Employee => "employee",
    Customer => "customer",
});

string_enum!(OrderStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Preparing => "preparing",
    Ready => "ready",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

string_enum!(OrderType {
    Product => "product",
    Food => "food",
});

string_enum!(PaymentMethod {
    Mpesa => "mpesa",
    Cash => "cash",
});

string_enum!(PaymentStatus {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
});

string_enum!(ServiceType {
    Taxi => "taxi",
    Grocery => "grocery",
    Laundry => "laundry",
    Cleaning => "cleaning",
    Delivery => "delivery",
    Other => "other",
});

string_enum!(RequestStatus {
    Pending => "pending",
    Assigned => "assigned",
    InProgress => "in-progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

string_enum!(EmployeeRole {
    Driver => "driver",
    Delivery => "delivery",
    Cleaner => "cleaner",
    Admin => "admin",
});

string_enum!(MessageType {
    CustomerSupport => "customer-support",
    Internal => "internal",
    System => "system",
});

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

// ---- Catalog ----

/// Shared catalog shape; `X` carries the fields that differ between
/// shop products and menu dishes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem<X> {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub category: String,
    pub image_url: String,
    #[serde(alias = "isActive")]
    pub is_available: bool,
    #[serde(flatten)]
    pub details: X,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetails {
    /// Minutes.
    pub prep_time: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub stock: u32,
}

pub type FoodItem = CatalogItem<FoodDetails>;
pub type Product = CatalogItem<ProductDetails>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogItem<X> {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(flatten)]
    pub details: X,
}

pub type NewFoodItem = NewCatalogItem<FoodDetails>;
pub type NewProduct = NewCatalogItem<ProductDetails>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPatch<X> {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub details: Option<X>,
}

impl<X> Default for CatalogPatch<X> {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            price: None,
            category: None,
            image_url: None,
            is_available: None,
            details: None,
        }
    }
}

fn default_true() -> bool {
    true
}

// ---- Cart & orders ----

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_id: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub price: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

fn default_quantity() -> u32 {
    1
}

impl CartItem {
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

impl From<&FoodItem> for CartItem {
    fn from(item: &FoodItem) -> Self {
        CartItem {
            id: item.id.clone(),
            product_id: None,
            food_id: Some(item.id.clone()),
            quantity: 1,
            price: item.price,
            name: item.name.clone(),
            image_url: item.image_url.clone(),
        }
    }
}

impl From<&Product> for CartItem {
    fn from(item: &Product) -> Self {
        CartItem {
            id: item.id.clone(),
            product_id: Some(item.id.clone()),
            food_id: None,
            quantity: 1,
            price: item.price,
            name: item.name.clone(),
            image_url: item.image_url.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub items: Vec<CartItem>,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ---- Service requests ----

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub service_type: ServiceType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropoff_location: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    pub budget: u64,
    pub status: RequestStatus,
    /// Employee id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The booking form; the customer comes from the session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewServiceRequest {
    pub service_type: ServiceType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub dropoff_location: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    pub budget: u64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ---- Employees ----

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: EmployeeRole,
    pub is_active: bool,
    pub rating: f32,
    pub total_jobs: u32,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: EmployeeRole,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<EmployeeRole>,
    pub is_active: Option<bool>,
    pub skills: Option<Vec<String>>,
}

// ---- Payments ----

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub amount: u64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

/// M-Pesa gateway credentials, kept apart from the general settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySettings {
    pub mpesa_paybill: String,
    pub mpesa_till: String,
    pub business_short_code: String,
    pub passkey: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        GatewaySettings {
            mpesa_paybill: "123456".to_string(),
            mpesa_till: "654321".to_string(),
            business_short_code: "174379".to_string(),
            passkey: "your-passkey-here".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    /// Generated when absent.
    #[serde(default)]
    pub order_id: Option<String>,
    pub customer_id: String,
    pub customer_name: String,
    pub amount: u64,
    pub method: PaymentMethod,
}

// ---- Messages ----

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub to: String,
    pub subject: String,
    pub content: String,
    #[serde(rename = "type", default = "default_message_type")]
    pub kind: MessageType,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

fn default_message_type() -> MessageType {
    MessageType::Internal
}

// ---- Audit ----

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_data: Option<Value>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

// ---- Settings ----

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub company: CompanySettings,
    pub branding: BrandingSettings,
    pub notifications: NotificationSettings,
    pub payment: PaymentSettings,
    pub system: SystemSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettings {
    pub name: String,
    pub tagline: String,
    pub phone1: String,
    pub phone2: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrandingSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub logo: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub order_updates: bool,
    pub payment_alerts: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettings {
    pub mpesa_paybill: String,
    pub mpesa_till: String,
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub timezone: String,
    pub language: String,
    pub date_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            company: CompanySettings {
                name: "QUICKLINK SERVICES".to_string(),
                tagline: "Your Time, Our Priority".to_string(),
                phone1: "0111679286".to_string(),
                phone2: "0717562660".to_string(),
                email: "info@quicklinkservices.com".to_string(),
                address: "Nairobi, Kenya".to_string(),
            },
            branding: BrandingSettings {
                primary_color: "#8B0000".to_string(),
                secondary_color: "#000000".to_string(),
                accent_color: "#FFD700".to_string(),
                logo: String::new(),
            },
            notifications: NotificationSettings {
                email_notifications: true,
                sms_notifications: true,
                order_updates: true,
                payment_alerts: true,
            },
            payment: PaymentSettings {
                mpesa_paybill: "123456".to_string(),
                mpesa_till: "654321".to_string(),
                currency: "KES".to_string(),
            },
            system: SystemSettings {
                timezone: "Africa/Nairobi".to_string(),
                language: "en".to_string(),
                date_format: "DD/MM/YYYY".to_string(),
            },
        }
    }
}
