//! Storefront domain: product catalog, cart arithmetic, checkout validation.

use regex::Regex;
use shared_types::{CartItem, Category, Product};
use std::sync::OnceLock;

/// Orders above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: u64 = 50_000_000;
pub const SHIPPING_FEE: u64 = 50_000;

pub const ALL_CATEGORIES: &str = "all";

// ============================================================================
// Catalog
// ============================================================================

static CATALOG: OnceLock<Vec<Product>> = OnceLock::new();

#[allow(clippy::too_many_arguments)]
fn product(
    id: u32,
    name: &str,
    price: u64,
    original_price: Option<u64>,
    category: &str,
    description: &str,
    features: &[&str],
    rating: f32,
    reviews: u32,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        price,
        original_price,
        category: category.to_string(),
        description: description.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        image: format!("/assets/products/{id}.webp"),
        in_stock: true,
        rating,
        reviews,
    }
}

pub fn catalog() -> &'static [Product] {
    CATALOG.get_or_init(|| {
        vec![
            product(
                1,
                "iPhone 15 Pro",
                29_990_000,
                Some(32_990_000),
                "phone",
                "A17 Pro chip, pro camera system and a titanium design.",
                &[
                    "3nm A17 Pro chip",
                    "48MP main camera with 3x optical zoom",
                    "6.1-inch Super Retina XDR display",
                    "Titanium frame",
                    "USB-C",
                    "IP68 water resistance",
                ],
                4.8,
                1234,
            ),
            product(
                2,
                "Samsung Galaxy S24",
                25_990_000,
                None,
                "phone",
                "Galaxy AI features in a compact flagship.",
                &["Snapdragon 8 Gen 3", "120Hz Dynamic AMOLED", "50MP camera"],
                4.6,
                842,
            ),
            product(
                3,
                "MacBook Air M3",
                34_990_000,
                None,
                "laptop",
                "Thin, silent and fast with Apple M3.",
                &["Apple M3 chip", "18-hour battery", "13.6-inch Liquid Retina"],
                4.9,
                611,
            ),
            product(
                4,
                "iPad Pro",
                24_990_000,
                None,
                "tablet",
                "Tandem OLED display and M4 performance.",
                &["Apple M4 chip", "Ultra Retina XDR", "Apple Pencil Pro support"],
                4.7,
                389,
            ),
            product(
                5,
                "Dell XPS 13",
                32_990_000,
                None,
                "laptop",
                "Edge-to-edge InfinityEdge display in a 13-inch chassis.",
                &["Intel Core Ultra 7", "13.4-inch display", "1.19 kg"],
                4.5,
                275,
            ),
            product(
                6,
                "AirPods Pro",
                6_990_000,
                None,
                "accessory",
                "Active noise cancellation and adaptive audio.",
                &["H2 chip", "Active noise cancellation", "USB-C MagSafe case"],
                4.8,
                2051,
            ),
        ]
    })
}

pub fn categories() -> Vec<Category> {
    [
        (ALL_CATEGORIES, "All"),
        ("phone", "Phones"),
        ("laptop", "Laptops"),
        ("tablet", "Tablets"),
        ("accessory", "Accessories"),
    ]
    .into_iter()
    .map(|(id, name)| Category {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}

pub fn find_product(id: u32) -> Option<&'static Product> {
    catalog().iter().find(|p| p.id == id)
}

pub fn products_in_category(category: &str) -> Vec<&'static Product> {
    catalog()
        .iter()
        .filter(|p| category == ALL_CATEGORIES || p.category == category)
        .collect()
}

/// `29990000` -> `29.990.000đ`
pub fn format_vnd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped.push('đ');
    grouped
}

// ============================================================================
// Cart
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds `quantity` units, merging with an existing line.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }
        self.items.push(CartItem {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity,
            image: product.image.clone(),
        });
    }

    /// Zero removes the line.
    pub fn set_quantity(&mut self, product_id: u32, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: u32) {
        self.items.retain(|i| i.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> u64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn shipping(&self) -> u64 {
        if self.subtotal() > FREE_SHIPPING_THRESHOLD {
            0
        } else {
            SHIPPING_FEE
        }
    }

    pub fn total(&self) -> u64 {
        self.subtotal() + self.shipping()
    }
}

// ============================================================================
// Checkout
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    BankTransfer,
    Card,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CashOnDelivery,
        PaymentMethod::BankTransfer,
        PaymentMethod::Card,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cod",
            PaymentMethod::BankTransfer => "bank",
            PaymentMethod::Card => "card",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on delivery",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::Card => "Credit / debit card",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Email address is invalid")]
    InvalidEmail,

    #[error("Phone number is invalid")]
    InvalidPhone,

    #[error("Your cart is empty")]
    EmptyCart,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub ward: String,
    pub payment_method: PaymentMethod,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("valid phone regex"))
}

impl CheckoutForm {
    /// Returns every problem in field order; empty means submittable.
    pub fn validate(&self, cart: &Cart) -> Vec<CheckoutError> {
        let mut errors = Vec::new();
        if cart.is_empty() {
            errors.push(CheckoutError::EmptyCart);
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(CheckoutError::Missing("Email"));
        } else if !email_regex().is_match(email) {
            errors.push(CheckoutError::InvalidEmail);
        }

        for (value, field) in [
            (&self.first_name, "First name"),
            (&self.last_name, "Last name"),
        ] {
            if value.trim().is_empty() {
                errors.push(CheckoutError::Missing(field));
            }
        }

        let phone = self.phone.trim();
        if phone.is_empty() {
            errors.push(CheckoutError::Missing("Phone"));
        } else if !phone_regex().is_match(phone) {
            errors.push(CheckoutError::InvalidPhone);
        }

        for (value, field) in [
            (&self.address, "Address"),
            (&self.city, "City"),
            (&self.district, "District"),
            (&self.ward, "Ward"),
        ] {
            if value.trim().is_empty() {
                errors.push(CheckoutError::Missing(field));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> CheckoutForm {
        CheckoutForm {
            email: "buyer@example.com".to_string(),
            first_name: "Minh".to_string(),
            last_name: "Tran".to_string(),
            phone: "+84 (90) 123-4567".to_string(),
            address: "12 Ly Thuong Kiet".to_string(),
            city: "Ha Noi".to_string(),
            district: "Hoan Kiem".to_string(),
            ward: "Trang Tien".to_string(),
            payment_method: PaymentMethod::Card,
        }
    }

    #[test]
    fn format_vnd_groups_thousands() {
        assert_eq!(format_vnd(0), "0đ");
        assert_eq!(format_vnd(999), "999đ");
        assert_eq!(format_vnd(50_000), "50.000đ");
        assert_eq!(format_vnd(29_990_000), "29.990.000đ");
        assert_eq!(format_vnd(1_234_567_890), "1.234.567.890đ");
    }

    #[test]
    fn category_filter() {
        assert_eq!(products_in_category(ALL_CATEGORIES).len(), catalog().len());
        let laptops = products_in_category("laptop");
        assert_eq!(laptops.len(), 2);
        assert!(laptops.iter().all(|p| p.category == "laptop"));
        assert!(products_in_category("camera").is_empty());
    }

    #[test]
    fn add_merges_lines_and_zero_quantity_removes() {
        let phone = find_product(1).unwrap();
        let pods = find_product(6).unwrap();
        let mut cart = Cart::default();

        cart.add(phone, 1);
        cart.add(pods, 2);
        cart.add(pods, 1);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 4);

        cart.set_quantity(6, 0);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id, 1);
    }

    #[test]
    fn shipping_is_free_above_threshold() {
        let phone = find_product(1).unwrap();
        let pods = find_product(6).unwrap();
        let mut cart = Cart::default();

        cart.add(phone, 1);
        cart.add(pods, 2);
        assert_eq!(cart.subtotal(), 43_970_000);
        assert_eq!(cart.shipping(), SHIPPING_FEE);
        assert_eq!(cart.total(), 44_020_000);

        cart.set_quantity(1, 2);
        assert_eq!(cart.subtotal(), 73_960_000);
        assert_eq!(cart.shipping(), 0);
        assert_eq!(cart.total(), 73_960_000);
    }

    #[test]
    fn checkout_accepts_complete_form() {
        let mut cart = Cart::default();
        cart.add(find_product(3).unwrap(), 1);
        assert!(filled_form().validate(&cart).is_empty());
    }

    #[test]
    fn checkout_reports_each_problem() {
        let form = CheckoutForm {
            email: "not-an-email".to_string(),
            phone: "call me".to_string(),
            city: String::new(),
            ..filled_form()
        };
        let errors = form.validate(&Cart::default());
        assert_eq!(
            errors,
            vec![
                CheckoutError::EmptyCart,
                CheckoutError::InvalidEmail,
                CheckoutError::InvalidPhone,
                CheckoutError::Missing("City"),
            ]
        );
    }

    #[test]
    fn payment_method_round_trips_through_form_values() {
        for method in PaymentMethod::ALL {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(method));
        }
        assert_eq!(PaymentMethod::parse("crypto"), None);
    }
}
