use crate::ShoppingItem;

/// Turns an aggregated shopping list into a downloadable document.
pub trait DocumentRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn file_name(&self) -> &'static str;

    fn render(&self, items: &[ShoppingItem]) -> Vec<u8>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRenderer;

impl DocumentRenderer for PlainTextRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_name(&self) -> &'static str {
        "shopping_list.txt"
    }

    fn render(&self, items: &[ShoppingItem]) -> Vec<u8> {
        let mut lines = vec!["Shopping list".to_owned(), String::new()];

        if items.is_empty() {
            lines.push("Your shopping list is empty.".to_owned());
        }

        for item in items {
            lines.push(format!(
                "{} ({}) - {}",
                capitalize(&item.name),
                item.measurement_unit,
                item.total_amount
            ));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text.into_bytes()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
