//! Table filter catalog.
//!
//! The option set is fixed at build time. The empty value means "no table"
//! and sends an unscoped query. Filtering is a pure function over the
//! catalog so the selector can narrow it as the user types.

#[cfg(test)]
#[path = "tables_test.rs"]
mod tables_test;

/// Label shown when the current value does not match any option.
pub const UNSELECTED_LABEL: &str = "Select a table";

/// A selectable table scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// All table scopes the assistant understands, in display order.
pub const TABLE_OPTIONS: &[TableOption] = &[
    TableOption { value: "", label: "No table (general query)" },
    TableOption { value: "closed_deal", label: "Closed Deal" },
    TableOption { value: "invoice", label: "Invoice" },
    TableOption { value: "payment", label: "Payment" },
    TableOption { value: "ar", label: "AR" },
    TableOption { value: "ap", label: "AP" },
];

/// Options whose label contains `term`, ignoring case. Catalog order is kept.
#[must_use]
pub fn filter_options<'a>(options: &'a [TableOption], term: &str) -> Vec<&'a TableOption> {
    let needle = term.to_lowercase();
    options
        .iter()
        .filter(|option| option.label.to_lowercase().contains(&needle))
        .collect()
}

/// Look up the option with exactly this value.
#[must_use]
pub fn find_option<'a>(options: &'a [TableOption], value: &str) -> Option<&'a TableOption> {
    options.iter().find(|option| option.value == value)
}

/// Match user input against values first, then labels (ignoring case).
#[must_use]
pub fn resolve_option<'a>(options: &'a [TableOption], input: &str) -> Option<&'a TableOption> {
    let input = input.trim();
    find_option(options, input)
        .or_else(|| options.iter().find(|option| option.label.eq_ignore_ascii_case(input)))
}

/// Label for `value`, or [`UNSELECTED_LABEL`] when it is not in the catalog.
#[must_use]
pub fn display_label(options: &[TableOption], value: &str) -> &'static str {
    find_option(options, value).map_or(UNSELECTED_LABEL, |option| option.label)
}
