//! HTML rendering of the product catalog.

use std::fmt::Write;

use tair_products::Product;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Product Store</title>
    <style>
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background-color: #f7f7f7; margin: 0; padding: 0; }
        header { background-color: #4CAF50; color: white; padding: 20px; text-align: center; }
        h1 { margin: 0; }
        .container { padding: 30px; max-width: 900px; margin: auto; }
        table { width: 100%; border-collapse: collapse; background-color: white; box-shadow: 0 0 10px rgba(0,0,0,0.1); }
        th, td { padding: 15px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background-color: #f2f2f2; }
        tr:hover { background-color: #f1f1f1; }
        .no-products { text-align: center; padding: 20px; font-style: italic; color: #666; }
        form { margin-top: 30px; display: flex; gap: 10px; }
    </style>
</head>
<body>
    <header>
        <h1>Our Products</h1>
    </header>
    <div class="container">
"#;

const ADD_FORM: &str = r#"        <form method="post" action="/products">
            <input type="text" name="name" placeholder="Name" required>
            <input type="text" name="price" placeholder="Price" required>
            <button type="submit">Add product</button>
        </form>
"#;

const PAGE_TAIL: &str = "    </div>\n</body>\n</html>\n";

/// Render the home page: a product table, or a placeholder when the list is empty.
pub fn render_home(products: &[Product]) -> String {
    let mut html = String::from(PAGE_HEAD);

    if products.is_empty() {
        html.push_str("        <div class=\"no-products\">No products available</div>\n");
    } else {
        html.push_str(
            "        <table>\n            <thead>\n                <tr><th>ID</th><th>Name</th><th>Price ($)</th></tr>\n            </thead>\n            <tbody>\n",
        );
        for p in products {
            // Writing to a String cannot fail.
            let _ = writeln!(
                html,
                "                <tr><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
                p.id,
                escape(&p.name),
                p.price
            );
        }
        html.push_str("            </tbody>\n        </table>\n");
    }

    html.push_str(ADD_FORM);
    html.push_str(PAGE_TAIL);
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
