//! Where each table lives and how to read it.
//!
//! Every extractor reads exactly one `Source`. When the wiki changes a page's
//! layout, the fix is an edit to the matching constant here.

use crate::parser::schema::{Column, TableSchema};

pub const WIKI_BASE: &str = "https://schedule-1.fandom.com/wiki";
pub const DEFAULT_OUTPUT: &str = "data.json";

#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub page: &'static str,
    pub schema: TableSchema,
}

impl Source {
    pub fn url(&self) -> String {
        format!("{}/{}", WIKI_BASE, self.page)
    }
}

pub const RANKS: Source = Source {
    page: "Ranks",
    schema: TableSchema {
        name: "ranks",
        table: "table.wikitable",
        sentinel: "Street Rat I",
        columns: &[
            Column::text("name", "td:nth-child(1)"),
            Column::number("total_xp", "td:nth-child(3)"),
        ],
    },
};

pub const EFFECTS: Source = Source {
    page: "Effects",
    schema: TableSchema {
        name: "effects",
        table: "table.wikitable",
        sentinel: "Causes user to jump higher",
        columns: &[
            Column::text("name", "td:nth-child(1) span[style]"),
            Column::number("multiplier", "td:nth-child(3)"),
            Column::optional_text("type", "td:nth-child(4)"),
            Column::optional_text("description", "td:nth-child(5)"),
        ],
    },
};

pub const DRUGS: Source = Source {
    page: "Drugs",
    schema: TableSchema {
        name: "drugs",
        table: "table.fandom-table",
        sentinel: "Street Rat I",
        columns: &[
            Column::text("name", "td:nth-child(1)"),
            Column::text("rank", "td:nth-child(3)"),
            Column::number("base_sell_value", "td:nth-child(5)"),
            Column::text("base_effect", "td:nth-child(6)"),
        ],
    },
};

pub const INGREDIENTS: Source = Source {
    page: "Ingredients",
    schema: TableSchema {
        name: "ingredients",
        table: "table.fandom-table",
        sentinel: "A refreshing can of Cuke",
        columns: &[
            Column::text("name", "td:nth-child(2)"),
            Column::number("buy_price", "td:nth-child(3)"),
            Column::text("rank", "td:nth-child(4)"),
            Column::text("base_effect", "td:nth-child(6)"),
        ],
    },
};

pub const MIXING: Source = Source {
    page: "Mixing",
    schema: TableSchema {
        name: "mixing",
        table: "table.fandom-table",
        sentinel: "only when Paranoia isn't already in the mix",
        columns: &[
            Column::text("effect", "td:nth-child(1) span[style]"),
            Column::text("product", "td:nth-child(2)"),
            Column::optional_text("replaces", "td:nth-child(3) span[style]"),
        ],
    },
};
