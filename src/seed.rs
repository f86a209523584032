//! Demo data every container starts from on a fresh profile.

use crate::models::{
    at, AuditLog, CatalogItem, Employee, EmployeeRole, FoodDetails, FoodItem, Message,
    MessageType, Payment, PaymentMethod, PaymentStatus, Product, ProductDetails, RequestStatus,
    ServiceRequest, ServiceType,
};
use serde_json::json;

#[allow(clippy::too_many_arguments)]
fn food(
    id: &str,
    name: &str,
    description: &str,
    price: u64,
    category: &str,
    image: &str,
    prep_time: u32,
    created: (u32, u32),
    updated: (u32, u32),
) -> FoodItem {
    CatalogItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        image_url: format!("https://images.pexels.com/photos/{image}"),
        is_available: true,
        details: FoodDetails { prep_time },
        created_at: at(2024, created.0, created.1, 0, 0),
        updated_at: at(2024, updated.0, updated.1, 0, 0),
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    price: u64,
    stock: u32,
    category: &str,
    image: &str,
    created: u32,
    updated: u32,
) -> Product {
    CatalogItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        image_url: format!("https://images.pexels.com/photos/{image}"),
        is_available: true,
        details: ProductDetails { stock },
        created_at: at(2024, 1, created, 0, 0),
        updated_at: at(2024, 1, updated, 0, 0),
    }
}

pub fn food_items() -> Vec<FoodItem> {
    vec![
        food(
            "1",
            "Chicken Biryani",
            "Aromatic basmati rice with tender chicken and spices",
            1200,
            "Indian",
            "1109197/pexels-photo-1109197.jpeg",
            35,
            (1, 15),
            (1, 25),
        ),
        food(
            "2",
            "Margherita Pizza",
            "Classic pizza with tomato sauce, mozzarella, and basil",
            1450,
            "Italian",
            "365459/pexels-photo-365459.jpeg",
            20,
            (1, 12),
            (1, 24),
        ),
        food(
            "3",
            "Beef Burger Deluxe",
            "Juicy beef patty with lettuce, tomato, and cheese",
            890,
            "Fast Food",
            "1639557/pexels-photo-1639557.jpeg",
            15,
            (1, 18),
            (1, 26),
        ),
    ]
}

pub fn products() -> Vec<Product> {
    vec![
        product("1", "Samsung Galaxy S24 Ultra", "Latest flagship smartphone with AI features and S Pen", 129999, 25, "Smartphones", "788946/pexels-photo-788946.jpeg", 15, 20),
        product("2", "MacBook Pro M3 16\"", "Powerful laptop for professionals with M3 chip", 299999, 12, "Laptops", "205421/pexels-photo-205421.jpeg", 10, 22),
        product("3", "LG OLED 65\" Smart TV", "4K Ultra HD Smart TV with webOS and AI ThinQ", 189999, 8, "Electronics", "1201996/pexels-photo-1201996.jpeg", 5, 18),
        product("4", "Sony WH-1000XM5 Headphones", "Premium noise-canceling wireless headphones", 24999, 45, "Audio", "3394650/pexels-photo-3394650.jpeg", 12, 25),
        product("5", "HP Pavilion Gaming Desktop", "High-performance desktop for gaming and work", 89999, 15, "Computers", "2148222/pexels-photo-2148222.jpeg", 8, 21),
        product("6", "Samsung Smart Refrigerator", "French door refrigerator with smart features", 159999, 6, "Appliances", "1599791/pexels-photo-1599791.jpeg", 3, 19),
    ]
}

pub fn payments() -> Vec<Payment> {
    vec![
        Payment {
            id: "1".to_string(),
            order_id: "ORD-2025-001".to_string(),
            customer_id: "cust1".to_string(),
            customer_name: "John Doe".to_string(),
            amount: 129999,
            method: PaymentMethod::Mpesa,
            status: PaymentStatus::Pending,
            transaction_id: Some("MP240115001".to_string()),
            created_at: at(2025, 1, 15, 10, 30),
            verified_at: None,
        },
        Payment {
            id: "2".to_string(),
            order_id: "ORD-2025-002".to_string(),
            customer_id: "cust2".to_string(),
            customer_name: "Jane Smith".to_string(),
            amount: 2400,
            method: PaymentMethod::Mpesa,
            status: PaymentStatus::Paid,
            transaction_id: Some("MP240114002".to_string()),
            created_at: at(2025, 1, 14, 15, 45),
            verified_at: Some(at(2025, 1, 14, 15, 47)),
        },
        Payment {
            id: "3".to_string(),
            order_id: "ORD-2025-003".to_string(),
            customer_id: "cust3".to_string(),
            customer_name: "Mike Johnson".to_string(),
            amount: 5000,
            method: PaymentMethod::Cash,
            status: PaymentStatus::Paid,
            transaction_id: None,
            created_at: at(2025, 1, 13, 12, 20),
            verified_at: Some(at(2025, 1, 13, 14, 30)),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn employee(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    role: EmployeeRole,
    rating: f32,
    total_jobs: u32,
    joined: (i32, u32, u32),
    skills: &[&str],
) -> Employee {
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        role,
        is_active: true,
        rating,
        total_jobs,
        joined_at: at(joined.0, joined.1, joined.2, 0, 0),
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn employees() -> Vec<Employee> {
    vec![
        employee("1", "James Mwangi", "james@quicklinkservices.com", "0712345678", EmployeeRole::Driver, 4.8, 234, (2023, 6, 15), &["Navigation", "Customer Service", "Time Management"]),
        employee("2", "Mary Wanjiku", "mary@quicklinkservices.com", "0723456789", EmployeeRole::Delivery, 4.9, 189, (2023, 8, 22), &["Fast Delivery", "Package Handling", "Route Optimization"]),
        employee("3", "Peter Kiprotich", "peter@quicklinkservices.com", "0734567890", EmployeeRole::Cleaner, 4.7, 156, (2023, 9, 10), &["Deep Cleaning", "Laundry", "Organization"]),
        employee("4", "Grace Akinyi", "grace@quicklinkservices.com", "0745678901", EmployeeRole::Admin, 4.9, 0, (2023, 5, 1), &["Management", "Customer Relations", "Operations"]),
    ]
}

pub fn service_requests() -> Vec<ServiceRequest> {
    vec![
        ServiceRequest {
            id: "REQ-2025-001".to_string(),
            customer_id: "cust3".to_string(),
            customer_name: "Michael Johnson".to_string(),
            customer_phone: "0723456789".to_string(),
            customer_email: "michael@example.com".to_string(),
            service_type: ServiceType::Taxi,
            title: "Airport Pickup".to_string(),
            description: "Need pickup from JKIA to Westlands".to_string(),
            pickup_location: Some("Jomo Kenyatta International Airport".to_string()),
            dropoff_location: Some("Westlands, Nairobi".to_string()),
            scheduled_date: at(2025, 1, 16, 8, 0),
            budget: 3000,
            status: RequestStatus::Assigned,
            assigned_to: Some("1".to_string()),
            promo_code: None,
            created_at: at(2025, 1, 15, 20, 15),
            updated_at: at(2025, 1, 15, 20, 30),
            completed_at: None,
            notes: None,
        },
        ServiceRequest {
            id: "REQ-2025-002".to_string(),
            customer_id: "cust4".to_string(),
            customer_name: "Sarah Wilson".to_string(),
            customer_phone: "0734567890".to_string(),
            customer_email: "sarah@example.com".to_string(),
            service_type: ServiceType::Cleaning,
            title: "House Deep Cleaning".to_string(),
            description: "Need thorough cleaning for 3-bedroom apartment".to_string(),
            pickup_location: None,
            dropoff_location: None,
            scheduled_date: at(2025, 1, 17, 9, 0),
            budget: 5000,
            status: RequestStatus::Completed,
            assigned_to: Some("3".to_string()),
            promo_code: None,
            created_at: at(2025, 1, 12, 11, 20),
            updated_at: at(2025, 1, 17, 14, 45),
            completed_at: Some(at(2025, 1, 17, 14, 45)),
            notes: None,
        },
    ]
}

pub fn messages() -> Vec<Message> {
    vec![
        Message {
            id: "1".to_string(),
            from: "customer@example.com".to_string(),
            to: "admin@quicklinkservices.com".to_string(),
            subject: "Order Delivery Issue".to_string(),
            content: "My order #ORD-2025-001 was supposed to be delivered today but I haven't received it yet.".to_string(),
            is_read: false,
            created_at: at(2025, 1, 15, 10, 30),
            kind: MessageType::CustomerSupport,
            order_id: Some("ORD-2025-001".to_string()),
            request_id: None,
        },
        Message {
            id: "2".to_string(),
            from: "admin@quicklinkservices.com".to_string(),
            to: "james@quicklinkservices.com".to_string(),
            subject: "New Assignment".to_string(),
            content: "Please handle the taxi request REQ-2025-001 for airport pickup.".to_string(),
            is_read: true,
            created_at: at(2025, 1, 15, 9, 15),
            kind: MessageType::Internal,
            order_id: None,
            request_id: Some("REQ-2025-001".to_string()),
        },
        Message {
            id: "3".to_string(),
            from: "system@quicklinkservices.com".to_string(),
            to: "admin@quicklinkservices.com".to_string(),
            subject: "Payment Received".to_string(),
            content: "Payment of KES 129,999 has been received for order ORD-2025-003.".to_string(),
            is_read: true,
            created_at: at(2025, 1, 14, 16, 45),
            kind: MessageType::System,
            order_id: Some("ORD-2025-003".to_string()),
            request_id: None,
        },
    ]
}

pub fn audit_logs() -> Vec<AuditLog> {
    let entry = |id: &str, action: &str, entity_type: &str, entity_id: &str| AuditLog {
        id: id.to_string(),
        user_id: "admin1".to_string(),
        user_name: "Admin User".to_string(),
        action: action.to_string(),
        entity_type: entity_type.to_string(),
        entity_id: entity_id.to_string(),
        old_data: None,
        new_data: None,
        timestamp: at(2025, 1, 15, 10, 30),
        ip_address: Some("192.168.1.100".to_string()),
    };

    vec![
        AuditLog {
            new_data: Some(json!({ "name": "John Doe", "role": "driver" })),
            ..entry("1", "Created Employee", "Employee", "emp-001")
        },
        AuditLog {
            old_data: Some(json!({ "status": "pending" })),
            new_data: Some(json!({ "status": "confirmed" })),
            timestamp: at(2025, 1, 15, 9, 15),
            ..entry("2", "Updated Order Status", "Order", "ORD-2025-001")
        },
        AuditLog {
            old_data: Some(json!({ "name": "Old Product", "price": 5000 })),
            timestamp: at(2025, 1, 14, 16, 45),
            ..entry("3", "Deleted Product", "Product", "prod-123")
        },
    ]
}
