pub const APP_STYLES: &str = r#"
:root {
    --bg: #ffffff;
    --bg-muted: #f4f4f5;
    --bg-accent: #e4e4e7;
    --text-primary: #18181b;
    --text-secondary: #71717a;
    --border-color: #e4e4e7;
    --primary: #2563eb;
    --primary-text: #ffffff;
    --danger: #dc2626;
    --success: #16a34a;
    --user-bubble: #2563eb;
    --assistant-bubble: #f4f4f5;
}

:root.dark {
    --bg: #0f172a;
    --bg-muted: #1e293b;
    --bg-accent: #334155;
    --text-primary: #f8fafc;
    --text-secondary: #94a3b8;
    --border-color: #334155;
    --primary: #3b82f6;
    --assistant-bubble: #1e293b;
}

* { box-sizing: border-box; }

body {
    margin: 0;
    font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
    background: var(--bg);
    color: var(--text-primary);
}

a { color: inherit; text-decoration: none; }

.btn {
    display: inline-flex;
    align-items: center;
    gap: 0.35rem;
    padding: 0.45rem 0.9rem;
    border-radius: 0.4rem;
    border: 1px solid var(--border-color);
    background: var(--bg);
    color: var(--text-primary);
    cursor: pointer;
    font-size: 0.875rem;
}

.btn:disabled { opacity: 0.5; cursor: not-allowed; }
.btn-primary { background: var(--primary); color: var(--primary-text); border-color: var(--primary); }
.btn-ghost { border-color: transparent; background: transparent; }
.btn-danger { color: var(--danger); }

.app-header {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 0.5rem 1rem;
    border-bottom: 1px solid var(--border-color);
    background: var(--bg);
}

.app-header .brand { font-weight: 700; }
.app-header .header-actions { display: flex; align-items: center; gap: 0.5rem; }
.app-header .welcome { font-size: 0.875rem; color: var(--text-secondary); }

.not-found {
    display: flex;
    flex-direction: column;
    align-items: center;
    justify-content: center;
    min-height: 70vh;
    gap: 1rem;
}

.not-found h1 { font-size: 4rem; margin: 0; }
"#;

pub const CHAT_STYLES: &str = r#"
.chat-shell {
    display: flex;
    flex-direction: column;
    height: 100vh;
}

.chat-body {
    flex: 1;
    min-height: 0;
    display: flex;
}

.sidebar {
    width: 260px;
    border-right: 1px solid var(--border-color);
    background: var(--bg-muted);
    display: flex;
    flex-direction: column;
    padding: 0.75rem;
    gap: 0.5rem;
    overflow-y: auto;
}

.sidebar.collapsed { display: none; }

.sidebar-header {
    display: flex;
    align-items: center;
    justify-content: space-between;
}

.sidebar-header h2 { font-size: 1.05rem; margin: 0; }

.history-item {
    display: flex;
    align-items: center;
    gap: 0.25rem;
    border-radius: 0.4rem;
    padding: 0.35rem 0.5rem;
    font-size: 0.875rem;
}

.history-item:hover { background: var(--bg-accent); }
.history-item.active { background: var(--bg-accent); font-weight: 600; }
.history-item .history-link { flex: 1; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.history-item .confirming { color: var(--danger); }

.history-empty, .history-loading {
    font-size: 0.875rem;
    color: var(--text-secondary);
    padding: 0.5rem;
}

.chat-main {
    flex: 1;
    min-width: 0;
    display: flex;
    flex-direction: column;
}

.chat-title-bar {
    padding: 0.6rem 1rem;
    border-bottom: 1px solid var(--border-color);
    font-weight: 600;
}

.message-list {
    flex: 1;
    overflow-y: auto;
    padding: 1rem;
    display: flex;
    flex-direction: column;
    gap: 0.75rem;
}

.empty-state {
    margin: auto;
    text-align: center;
    color: var(--text-secondary);
}

.message-row { display: flex; gap: 0.5rem; max-width: 80%; }
.message-row.user-row { align-self: flex-end; flex-direction: row-reverse; }
.message-row.assistant-row { align-self: flex-start; }

.avatar {
    width: 2rem;
    height: 2rem;
    border-radius: 999px;
    display: flex;
    align-items: center;
    justify-content: center;
    font-size: 0.8rem;
    font-weight: 700;
    background: var(--bg-accent);
    flex-shrink: 0;
}

.message-bubble {
    padding: 0.6rem 0.85rem;
    border-radius: 0.75rem;
    line-height: 1.5;
    overflow-wrap: anywhere;
}

.user-bubble { background: var(--user-bubble); color: #ffffff; white-space: pre-wrap; }
.assistant-bubble { background: var(--assistant-bubble); }
.assistant-bubble pre { overflow-x: auto; padding: 0.5rem; border-radius: 0.4rem; background: rgba(0, 0, 0, 0.08); }
.assistant-bubble table { border-collapse: collapse; }
.assistant-bubble th, .assistant-bubble td { border: 1px solid var(--border-color); padding: 0.25rem 0.5rem; }

.message-meta {
    display: flex;
    gap: 0.5rem;
    align-items: center;
    font-size: 0.7rem;
    color: var(--text-secondary);
    margin-top: 0.2rem;
}

.copy-button {
    border: none;
    background: transparent;
    color: inherit;
    cursor: pointer;
    font-size: 0.7rem;
}

.typing-indicator { display: inline-flex; gap: 4px; padding: 0.25rem 0; }
.typing-indicator span {
    width: 6px;
    height: 6px;
    border-radius: 999px;
    background: var(--text-secondary);
    animation: typing 1.2s infinite ease-in-out;
}
.typing-indicator span:nth-child(2) { animation-delay: 0.15s; }
.typing-indicator span:nth-child(3) { animation-delay: 0.3s; }

@keyframes typing {
    0%, 80%, 100% { opacity: 0.3; transform: translateY(0); }
    40% { opacity: 1; transform: translateY(-3px); }
}

.polling-bar {
    display: flex;
    align-items: center;
    justify-content: center;
    gap: 0.5rem;
    font-size: 0.8rem;
    color: var(--text-secondary);
    padding: 0.25rem;
}

.chat-input-area {
    border-top: 1px solid var(--border-color);
    padding: 0.75rem 1rem;
}

.input-wrapper { display: flex; gap: 0.5rem; align-items: flex-end; }

.chat-textarea {
    flex: 1;
    resize: none;
    min-height: 2.5rem;
    max-height: 10rem;
    padding: 0.55rem 0.75rem;
    border-radius: 0.5rem;
    border: 1px solid var(--border-color);
    background: var(--bg);
    color: var(--text-primary);
    font: inherit;
}

.input-hint { font-size: 0.7rem; color: var(--text-secondary); margin-top: 0.25rem; }

.error-banner {
    margin: 0.5rem 1rem 0;
    padding: 0.5rem 0.75rem;
    border-radius: 0.4rem;
    background: rgba(220, 38, 38, 0.1);
    color: var(--danger);
    font-size: 0.85rem;
}
"#;

pub const AUTH_STYLES: &str = r#"
.auth-page {
    min-height: 100vh;
    display: flex;
    align-items: center;
    justify-content: center;
    background: var(--bg-muted);
}

.auth-card {
    width: 100%;
    max-width: 380px;
    background: var(--bg);
    border: 1px solid var(--border-color);
    border-radius: 0.75rem;
    padding: 1.5rem;
    display: flex;
    flex-direction: column;
    gap: 0.75rem;
}

.auth-card h1 { margin: 0; font-size: 1.4rem; }

.field { display: flex; flex-direction: column; gap: 0.25rem; font-size: 0.875rem; }

.field input, .field select {
    padding: 0.5rem 0.65rem;
    border-radius: 0.4rem;
    border: 1px solid var(--border-color);
    background: var(--bg);
    color: var(--text-primary);
    font: inherit;
}

.form-error { color: var(--danger); font-size: 0.85rem; }
.auth-switch { font-size: 0.85rem; color: var(--text-secondary); }
.auth-switch a { color: var(--primary); }
"#;

pub const SHOP_STYLES: &str = r#"
.shop-page { max-width: 1100px; margin: 0 auto; padding: 1.5rem 1rem; }

.shop-nav { display: flex; gap: 1rem; align-items: center; }
.cart-badge {
    background: var(--primary);
    color: var(--primary-text);
    border-radius: 999px;
    font-size: 0.7rem;
    padding: 0 0.4rem;
}

.hero {
    padding: 2rem;
    border-radius: 0.75rem;
    background: var(--bg-muted);
    margin-bottom: 1.5rem;
}

.category-tabs { display: flex; gap: 0.5rem; flex-wrap: wrap; margin-bottom: 1rem; }
.category-tabs .active { background: var(--primary); color: var(--primary-text); border-color: var(--primary); }

.product-grid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
    gap: 1rem;
}

.product-card {
    border: 1px solid var(--border-color);
    border-radius: 0.75rem;
    padding: 1rem;
    display: flex;
    flex-direction: column;
    gap: 0.5rem;
}

.product-card img, .product-detail img {
    width: 100%;
    aspect-ratio: 1;
    object-fit: contain;
    background: var(--bg-muted);
    border-radius: 0.5rem;
}

.price { font-weight: 700; color: var(--danger); }
.original-price { text-decoration: line-through; color: var(--text-secondary); font-size: 0.85rem; }
.rating { font-size: 0.8rem; color: var(--text-secondary); }

.product-detail { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
.product-detail ul { padding-left: 1.2rem; }
.quantity-picker { display: inline-flex; align-items: center; gap: 0.5rem; }

.cart-table { width: 100%; border-collapse: collapse; }
.cart-table td, .cart-table th { padding: 0.6rem; border-bottom: 1px solid var(--border-color); text-align: left; }

.order-summary {
    border: 1px solid var(--border-color);
    border-radius: 0.75rem;
    padding: 1rem;
    display: flex;
    flex-direction: column;
    gap: 0.4rem;
    max-width: 360px;
    margin-left: auto;
}

.summary-row { display: flex; justify-content: space-between; }
.summary-row.total { font-weight: 700; font-size: 1.1rem; }

.checkout-layout { display: grid; grid-template-columns: 2fr 1fr; gap: 2rem; }
.checkout-form { display: grid; grid-template-columns: 1fr 1fr; gap: 0.75rem; }
.checkout-form .wide { grid-column: 1 / -1; }
.payment-options { display: flex; flex-direction: column; gap: 0.35rem; }

.order-confirmation {
    text-align: center;
    padding: 3rem 1rem;
    display: flex;
    flex-direction: column;
    gap: 1rem;
    align-items: center;
}
"#;
