//! Storefront pages. Cart contents live in [`AppState`](crate::state::AppState).

use dioxus::prelude::*;
use shared_types::Product;

use crate::components::auth::RedirectToLogin;
use crate::components::header::Header;
use crate::components::styles::SHOP_STYLES;
use crate::router::Route;
use crate::state::use_app_state;
use crate::storefront::{
    catalog, categories, find_product, format_vnd, products_in_category, CheckoutError,
    CheckoutForm, PaymentMethod, ALL_CATEGORIES,
};

#[component]
fn ShopFrame(children: Element) -> Element {
    rsx! {
        style { {SHOP_STYLES} }
        Header {}
        div { class: "shop-page", {children} }
    }
}

#[component]
fn ProductCard(product: Product) -> Element {
    let mut app = use_app_state();
    let price = format_vnd(product.price);
    let original = product.original_price.map(format_vnd);
    let in_stock = product.in_stock;
    let id = product.id;
    let to_add = product.clone();

    rsx! {
        div {
            class: "product-card",
            Link {
                to: Route::ProductDetail { id },
                img { src: "{product.image}", alt: "{product.name}" }
                h3 { "{product.name}" }
            }
            div {
                span { class: "price", "{price}" }
                if let Some(original) = original {
                    " "
                    span { class: "original-price", "{original}" }
                }
            }
            div { class: "rating", "★ {product.rating} ({product.reviews} reviews)" }
            button {
                class: "btn btn-primary",
                disabled: !in_stock,
                onclick: move |_| app.cart.write().add(&to_add, 1),
                if in_stock { "Add to cart" } else { "Out of stock" }
            }
        }
    }
}

#[component]
pub fn Shop() -> Element {
    let featured: Vec<Product> = catalog().iter().take(4).cloned().collect();

    rsx! {
        ShopFrame {
            section {
                class: "hero",
                h1 { "Latest tech, delivered" }
                p { "Phones, laptops, tablets and accessories with free shipping on large orders." }
                Link { class: "btn btn-primary", to: Route::Products {}, "Browse all products" }
            }
            h2 { "Featured" }
            div {
                class: "product-grid",
                for product in featured {
                    ProductCard { key: "{product.id}", product }
                }
            }
        }
    }
}

#[component]
pub fn Products() -> Element {
    let mut selected = use_signal(|| ALL_CATEGORIES.to_string());
    let products: Vec<Product> = products_in_category(&selected.read())
        .into_iter()
        .cloned()
        .collect();

    rsx! {
        ShopFrame {
            h1 { "Products" }
            div {
                class: "category-tabs",
                for category in categories() {
                    button {
                        key: "{category.id}",
                        class: if *selected.read() == category.id { "btn active" } else { "btn" },
                        onclick: {
                            let id = category.id.clone();
                            move |_| selected.set(id.clone())
                        },
                        "{category.name}"
                    }
                }
            }
            if products.is_empty() {
                p { "No products in this category." }
            }
            div {
                class: "product-grid",
                for product in products {
                    ProductCard { key: "{product.id}", product }
                }
            }
        }
    }
}

#[component]
pub fn ProductDetail(id: u32) -> Element {
    let mut app = use_app_state();
    let mut quantity = use_signal(|| 1u32);

    let Some(product) = find_product(id) else {
        return rsx! {
            ShopFrame {
                h1 { "Product not found" }
                Link { class: "btn", to: Route::Products {}, "Back to products" }
            }
        };
    };

    let price = format_vnd(product.price);
    let original = product.original_price.map(format_vnd);

    rsx! {
        ShopFrame {
            Link { to: Route::Products {}, "← Back to products" }
            div {
                class: "product-detail",
                img { src: "{product.image}", alt: "{product.name}" }
                div {
                    h1 { "{product.name}" }
                    div { class: "rating", "★ {product.rating} ({product.reviews} reviews)" }
                    p {
                        span { class: "price", "{price}" }
                        if let Some(original) = original {
                            " "
                            span { class: "original-price", "{original}" }
                        }
                    }
                    p { "{product.description}" }
                    ul {
                        for feature in product.features.iter() {
                            li { "{feature}" }
                        }
                    }
                    div {
                        class: "quantity-picker",
                        button {
                            class: "btn",
                            disabled: quantity() <= 1,
                            onclick: move |_| quantity.set(quantity().saturating_sub(1).max(1)),
                            "−"
                        }
                        span { "{quantity}" }
                        button {
                            class: "btn",
                            onclick: move |_| quantity.set(quantity() + 1),
                            "+"
                        }
                    }
                    p {
                        button {
                            class: "btn btn-primary",
                            disabled: !product.in_stock,
                            onclick: move |_| app.cart.write().add(product, quantity()),
                            "Add to cart"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn OrderSummary() -> Element {
    let app = use_app_state();
    let cart = app.cart.read();
    let subtotal = format_vnd(cart.subtotal());
    let shipping = match cart.shipping() {
        0 => "Free".to_string(),
        fee => format_vnd(fee),
    };
    let total = format_vnd(cart.total());

    rsx! {
        div {
            class: "order-summary",
            div { class: "summary-row", span { "Subtotal" } span { "{subtotal}" } }
            div { class: "summary-row", span { "Shipping" } span { "{shipping}" } }
            div { class: "summary-row total", span { "Total" } span { "{total}" } }
        }
    }
}

#[component]
pub fn Cart() -> Element {
    let mut app = use_app_state();
    let items = app.cart.read().items().to_vec();

    if items.is_empty() {
        return rsx! {
            ShopFrame {
                h1 { "Your cart" }
                p { "Your cart is empty." }
                Link { class: "btn btn-primary", to: Route::Products {}, "Continue shopping" }
            }
        };
    }

    rsx! {
        ShopFrame {
            h1 { "Your cart" }
            table {
                class: "cart-table",
                thead {
                    tr {
                        th { "Product" }
                        th { "Price" }
                        th { "Quantity" }
                        th { "Total" }
                        th {}
                    }
                }
                tbody {
                    for item in items {
                        {
                            let product_id = item.product_id;
                            let quantity = item.quantity;
                            let price = format_vnd(item.price);
                            let line_total = format_vnd(item.line_total());
                            rsx! {
                                tr {
                                    key: "{product_id}",
                                    td { "{item.name}" }
                                    td { "{price}" }
                                    td {
                                        div {
                                            class: "quantity-picker",
                                            button {
                                                class: "btn",
                                                onclick: move |_| app.cart.write().set_quantity(product_id, quantity - 1),
                                                "−"
                                            }
                                            span { "{quantity}" }
                                            button {
                                                class: "btn",
                                                onclick: move |_| app.cart.write().set_quantity(product_id, quantity + 1),
                                                "+"
                                            }
                                        }
                                    }
                                    td { "{line_total}" }
                                    td {
                                        button {
                                            class: "btn btn-ghost btn-danger",
                                            onclick: move |_| app.cart.write().remove(product_id),
                                            "Remove"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            OrderSummary {}
            p {
                Link { class: "btn btn-primary", to: Route::Checkout {}, "Proceed to checkout" }
            }
        }
    }
}

#[component]
pub fn Checkout() -> Element {
    let mut app = use_app_state();
    let mut form = use_signal(CheckoutForm::default);
    let mut errors = use_signal(Vec::<CheckoutError>::new);
    let mut placed = use_signal(|| false);

    if !*app.is_authenticated.read() {
        return rsx! { RedirectToLogin {} };
    }

    if placed() {
        return rsx! {
            ShopFrame {
                div {
                    class: "order-confirmation",
                    h1 { "Thank you for your order!" }
                    p { "We will contact you shortly to confirm delivery." }
                    Link { class: "btn btn-primary", to: Route::Shop {}, "Back to shop" }
                }
            }
        };
    }

    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        let problems = form.peek().validate(&app.cart.peek());
        if problems.is_empty() {
            dioxus_logger::tracing::info!(
                "Order placed: {} item(s), payment {}",
                app.cart.peek().item_count(),
                form.peek().payment_method.as_str()
            );
            app.cart.write().clear();
            placed.set(true);
        }
        errors.set(problems);
    };

    let current = form.read().clone();
    let selected_payment = current.payment_method;

    rsx! {
        ShopFrame {
            h1 { "Checkout" }
            div {
                class: "checkout-layout",
                form {
                    class: "checkout-form",
                    onsubmit: on_submit,
                    label {
                        class: "field wide",
                        "Email"
                        input {
                            r#type: "email",
                            value: "{current.email}",
                            oninput: move |e| form.write().email = e.value(),
                        }
                    }
                    label {
                        class: "field",
                        "First name"
                        input {
                            value: "{current.first_name}",
                            oninput: move |e| form.write().first_name = e.value(),
                        }
                    }
                    label {
                        class: "field",
                        "Last name"
                        input {
                            value: "{current.last_name}",
                            oninput: move |e| form.write().last_name = e.value(),
                        }
                    }
                    label {
                        class: "field wide",
                        "Phone"
                        input {
                            r#type: "tel",
                            value: "{current.phone}",
                            oninput: move |e| form.write().phone = e.value(),
                        }
                    }
                    label {
                        class: "field wide",
                        "Address"
                        input {
                            value: "{current.address}",
                            oninput: move |e| form.write().address = e.value(),
                        }
                    }
                    label {
                        class: "field",
                        "City"
                        input {
                            value: "{current.city}",
                            oninput: move |e| form.write().city = e.value(),
                        }
                    }
                    label {
                        class: "field",
                        "District"
                        input {
                            value: "{current.district}",
                            oninput: move |e| form.write().district = e.value(),
                        }
                    }
                    label {
                        class: "field wide",
                        "Ward"
                        input {
                            value: "{current.ward}",
                            oninput: move |e| form.write().ward = e.value(),
                        }
                    }
                    fieldset {
                        class: "payment-options wide",
                        legend { "Payment method" }
                        for method in PaymentMethod::ALL {
                            label {
                                key: "{method.as_str()}",
                                input {
                                    r#type: "radio",
                                    name: "payment",
                                    value: method.as_str(),
                                    checked: selected_payment == method,
                                    onchange: move |e: FormEvent| {
                                        if let Some(method) = PaymentMethod::parse(&e.value()) {
                                            form.write().payment_method = method;
                                        }
                                    },
                                }
                                " {method.label()}"
                            }
                        }
                    }
                    if !errors.read().is_empty() {
                        ul {
                            class: "form-error wide",
                            for problem in errors.read().iter() {
                                li { "{problem}" }
                            }
                        }
                    }
                    button {
                        class: "btn btn-primary wide",
                        r#type: "submit",
                        "Place order"
                    }
                }
                OrderSummary {}
            }
        }
    }
}
