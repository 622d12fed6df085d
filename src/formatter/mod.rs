//! Turns generated recipe text into display markup.
//!
//! The generator is asked for a fixed layout (DESCRIPTION, PREPARATION
//! TIME, COOKING TIME, SERVINGS, INGREDIENTS, INSTRUCTIONS, TIPS) but its
//! casing and emphasis vary from run to run. The formatter walks the text
//! line by line, tracks which section it is in and which block is open,
//! and emits headers, paragraphs and lists accordingly.

pub mod markup;
pub mod section;

use std::borrow::Cow;
use std::path::Path;

use log::trace;
use tokio::io::AsyncReadExt;

use crate::PantryError;

pub use section::{ListKind, Section};

use markup::CLOSING_TAGS;
use section::{is_sub_heading, match_list_item};

/// Preamble lines (typically `[TITLE]` and the title itself) dropped
/// before the first Description marker
const MAX_PREAMBLE_LINES: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Escape HTML-significant characters in the recipe text. Off by
    /// default: the output is rendered as trusted markup.
    ///
    /// Formatting already-formatted markup again only keeps its headers
    /// with this off. With escaping on, the existing tags are recipe text
    /// like any other and come out escaped.
    pub escape_html: bool,
}

/// Format recipe text with the default options
pub fn format_recipe(content: &str) -> String {
    format_recipe_with(content, &FormatOptions::default())
}

/// Format recipe text into markup.
///
/// Never fails. Empty input gives an empty string. Text that matches no
/// section marker passes through as paragraphs.
pub fn format_recipe_with(content: &str, options: &FormatOptions) -> String {
    if content.trim().is_empty() {
        return String::new();
    }

    let lines: Vec<String> = content
        .lines()
        .map(|line| line.replace('*', "").trim().to_string())
        .collect();

    let mut renderer = Renderer::new(options);
    for line in strip_preamble(&lines) {
        if line.is_empty() {
            continue;
        }
        renderer.line(line);
    }

    collapse_closing_tags(&renderer.finish())
}

/// Read recipe text from a file, or from stdin when no path is given
pub async fn read_recipe_text(path: Option<&Path>) -> Result<String, PantryError> {
    let text = match path {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };
    Ok(text)
}

/// Collapse runs of identical closing tags (`</li>`, `</ul>`, `</ol>`)
/// down to a single tag.
pub fn collapse_closing_tags(markup: &str) -> String {
    let mut collapsed = markup.to_string();
    for tag in CLOSING_TAGS {
        let doubled = tag.repeat(2);
        while collapsed.contains(&doubled) {
            collapsed = collapsed.replace(&doubled, tag);
        }
    }
    collapsed
}

/// Drop the one or two non-blank lines that precede the first
/// Description marker. Lines that are themselves markers or list items
/// are recipe content, and keep the whole preamble.
fn strip_preamble(lines: &[String]) -> &[String] {
    let Some(start) = lines
        .iter()
        .position(|line| matches!(Section::match_marker(line), Some((Section::Description, _))))
    else {
        return lines;
    };

    let preamble: Vec<&String> = lines[..start].iter().filter(|l| !l.is_empty()).collect();
    let structured = preamble
        .iter()
        .any(|l| Section::match_marker(l).is_some() || match_list_item(l).is_some());
    if !structured && preamble.len() <= MAX_PREAMBLE_LINES {
        trace!("dropping {} preamble line(s)", preamble.len());
        &lines[start..]
    } else {
        lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Paragraph { empty: bool },
    List { kind: ListKind, empty: bool },
}

struct Renderer<'a> {
    options: &'a FormatOptions,
    section: Option<Section>,
    block: Block,
    out: String,
}

impl<'a> Renderer<'a> {
    fn new(options: &'a FormatOptions) -> Self {
        Renderer {
            options,
            section: None,
            block: Block::None,
            out: String::new(),
        }
    }

    fn line(&mut self, line: &str) {
        if let Some((section, rest)) = Section::match_marker(line) {
            self.enter(section, rest);
            return;
        }

        let list_kind = self.section.and_then(Section::list_kind);

        if self.section == Some(Section::Ingredients) && is_sub_heading(line) {
            self.close_block();
            let text = self.text(line);
            self.out.push_str(&markup::sub_header(&text));
            return;
        }

        match (list_kind, match_list_item(line)) {
            // Inside a list section every line is an item of the
            // section's list, prefixed or not.
            (Some(kind), item) => {
                let text = item.map_or(line, |(_, text)| text);
                self.item(kind, text);
            }
            (None, Some((kind, text))) => self.item(kind, text),
            (None, None) => self.paragraph(line),
        }
    }

    fn enter(&mut self, section: Section, rest: &str) {
        trace!("entering section {:?}", section);
        self.close_block();
        self.section = Some(section);
        self.out.push_str(&markup::header(section.keyword()));

        match section.list_kind() {
            Some(kind) => {
                self.open_list(kind);
                if !rest.is_empty() {
                    let text = match_list_item(rest).map_or(rest, |(_, text)| text);
                    self.item(kind, text);
                }
            }
            None => {
                self.out.push_str(&markup::open_body());
                self.block = Block::Paragraph { empty: true };
                if !rest.is_empty() {
                    self.paragraph(rest);
                }
            }
        }
    }

    fn paragraph(&mut self, line: &str) {
        match self.block {
            Block::Paragraph { empty: false } => self.out.push(' '),
            Block::Paragraph { empty: true } => {}
            _ => {
                self.close_block();
                self.out.push_str(&markup::open_body());
            }
        }
        let text = self.text(line);
        self.out.push_str(&text);
        self.block = Block::Paragraph { empty: false };
    }

    fn item(&mut self, kind: ListKind, text: &str) {
        if !matches!(self.block, Block::List { kind: open, .. } if open == kind) {
            self.close_block();
            self.open_list(kind);
        }
        let text = self.text(text);
        self.out.push_str(&markup::item(&text));
        self.block = Block::List { kind, empty: false };
    }

    fn open_list(&mut self, kind: ListKind) {
        self.out.push_str(&kind.open_tag());
        self.block = Block::List { kind, empty: true };
    }

    /// Close the open block. A block that never received content is
    /// removed instead, so a marker with nothing under it leaves only
    /// its header.
    fn close_block(&mut self) {
        match self.block {
            Block::None => {}
            Block::Paragraph { empty: true } => self.discard_open_tag(&markup::open_body()),
            Block::Paragraph { empty: false } => self.out.push_str(markup::CLOSE_BODY),
            Block::List { kind, empty: true } => self.discard_open_tag(&kind.open_tag()),
            Block::List { kind, empty: false } => self.out.push_str(kind.close_tag()),
        }
        self.block = Block::None;
    }

    fn discard_open_tag(&mut self, tag: &str) {
        if self.out.ends_with(tag) {
            self.out.truncate(self.out.len() - tag.len());
        }
    }

    fn text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.options.escape_html {
            html_escape::encode_text(text)
        } else {
            Cow::Borrowed(text)
        }
    }

    fn finish(mut self) -> String {
        self.close_block();
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAKE: &str =
        "Description: A cake.\nINGREDIENTS:\n- flour\n- sugar\nINSTRUCTIONS:\n1. Mix\n2. Bake";

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_recipe(""), "");
        assert_eq!(format_recipe("  \n\n \t"), "");
    }

    #[test]
    fn test_cake_example_order() {
        let html = format_recipe(CAKE);

        let description = html.find(">Description</h3>").unwrap();
        let ingredients = html.find(">Ingredients</h3>").unwrap();
        let ul = html.find("<ul").unwrap();
        let flour = html.find("<li>flour</li>").unwrap();
        let sugar = html.find("<li>sugar</li>").unwrap();
        let instructions = html.find(">Instructions</h3>").unwrap();
        let ol = html.find("<ol").unwrap();
        let mix = html.find("<li>Mix</li>").unwrap();
        let bake = html.find("<li>Bake</li>").unwrap();

        assert!(description < ingredients);
        assert!(ingredients < ul && ul < flour && flour < sugar);
        assert!(sugar < instructions);
        assert!(instructions < ol && ol < mix && mix < bake);
        assert_eq!(count(&html, "<li>"), 4);
        assert!(html.ends_with("</ol>"));
    }

    #[test]
    fn test_description_body_block() {
        let html = format_recipe("Description: A cake.");
        assert_eq!(
            html,
            format!(
                r#"<h3 class="{}">Description</h3><p class="{}">A cake.</p>"#,
                markup::HEADER_CLASS,
                markup::BODY_CLASS
            )
        );
    }

    #[test]
    fn test_meta_sections_keep_following_lines() {
        let html = format_recipe(
            "DESCRIPTION:\nA rich cake.\nGreat with tea.\nPREPARATION TIME: 15 minutes\nCooking time: 40 minutes\nServings: 8",
        );
        assert!(html.contains(">Description</h3>"));
        assert!(html.contains(">A rich cake. Great with tea.</p>"));
        assert!(html.contains(">Preparation Time</h3>"));
        assert!(html.contains(">15 minutes</p>"));
        assert!(html.contains(">Cooking Time</h3>"));
        assert!(html.contains(">40 minutes</p>"));
        assert!(html.contains(">Servings</h3>"));
        assert!(html.contains(">8</p>"));
        assert_eq!(count(&html, "<p"), count(&html, "</p>"));
    }

    #[test]
    fn test_strips_title_preamble() {
        let html = format_recipe("[TITLE]\nLemon Cake\nDESCRIPTION:\nZesty.");
        assert!(!html.contains("TITLE"));
        assert!(!html.contains("Lemon Cake"));
        assert!(html.starts_with("<h3"));
    }

    #[test]
    fn test_keeps_long_preamble() {
        let html = format_recipe("One\nTwo\nThree\nDescription: x");
        assert!(html.contains("One Two Three"));
    }

    #[test]
    fn test_keeps_preamble_with_sections() {
        let html = format_recipe("Ingredients:\n- flour\nDescription: late");
        assert!(html.contains(">Ingredients</h3>"));
        assert!(html.contains("<li>flour</li>"));
        assert!(html.contains("late"));
    }

    #[test]
    fn test_keeps_preamble_with_list_items() {
        let html = format_recipe("1. Preheat\nDescription: x");
        assert!(html.contains("<li>Preheat</li>"));
    }

    #[test]
    fn test_no_description_keeps_leading_text() {
        let html = format_recipe("Lemon Cake\nIngredients:\n- lemon");
        assert!(html.contains("Lemon Cake"));
    }

    #[test]
    fn test_item_on_marker_line_loses_prefix() {
        let html = format_recipe("INSTRUCTIONS: 1. Mix\n2. Bake");
        assert!(html.contains("<li>Mix</li><li>Bake</li>"));
        assert!(!html.contains("1. Mix"));

        let html = format_recipe("Tips: - Chill the dough");
        assert!(html.contains("<li>Chill the dough</li>"));
    }

    #[test]
    fn test_emphasis_removed() {
        let html = format_recipe(
            "**Description:** A *very* **good** cake.\n**Ingredients:**\n- *fresh* eggs",
        );
        assert!(!html.contains('*'));
        assert!(html.contains("A very good cake."));
        assert!(html.contains("<li>fresh eggs</li>"));
    }

    #[test]
    fn test_sub_headings_in_ingredients() {
        let html = format_recipe(
            "Ingredients:\nFor the dough:\n- flour\n- water\nFor the filling:\n- apples\nInstructions:\n1. Knead",
        );
        assert!(html.contains(">For the dough:</h4>"));
        assert!(html.contains(">For the filling:</h4>"));
        assert_eq!(count(&html, "<ul"), count(&html, "</ul>"));
        assert_eq!(count(&html, "<li>"), 4);

        let filling = html.find("For the filling:").unwrap();
        let apples = html.find("<li>apples</li>").unwrap();
        assert!(filling < apples);
    }

    #[test]
    fn test_marker_without_content_leaves_header_only() {
        let html = format_recipe("Ingredients:\nFor the dough:\n- flour\nTips:");
        assert!(html.starts_with(&format!(
            r#"<h3 class="{}">Ingredients</h3><h4"#,
            markup::HEADER_CLASS
        )));
        assert_eq!(count(&html, "<ul"), 1);
        assert!(html.ends_with(">Tips</h3>"));
    }

    #[test]
    fn test_sub_heading_outside_ingredients_is_an_item() {
        let html = format_recipe("Tips:\nFor the best results:");
        assert!(!html.contains("<h4"));
        assert!(html.contains("<li>For the best results:</li>"));
    }

    #[test]
    fn test_tips_section_is_unordered() {
        let html = format_recipe("Instructions:\n1. Bake\nTips:\n- Cool first\n- Dust with sugar");
        let tips = html.find(">Tips</h3>").unwrap();
        let ol_close = html.find("</ol>").unwrap();
        assert!(ol_close < tips);
        assert!(html[tips..].contains("<ul"));
        assert_eq!(count(&html[tips..], "<li>"), 2);
    }

    #[test]
    fn test_unprefixed_lines_in_list_sections_are_items() {
        let html = format_recipe("Ingredients:\n* flour\n* sugar");
        assert_eq!(count(&html, "<li>"), 2);
        assert!(html.contains("<li>flour</li>"));
    }

    #[test]
    fn test_unknown_section_passes_through() {
        let html = format_recipe("Servings: 2\nNotes: keep chilled");
        assert!(html.contains("Notes: keep chilled"));
        assert!(!html.contains(">Notes</h3>"));
    }

    #[test]
    fn test_out_of_order_sections_stay_balanced() {
        let html = format_recipe("Instructions:\n1. Mix\nIngredients:\n- flour\nDescription: late");
        for (open, close) in [("<ul", "</ul>"), ("<ol", "</ol>"), ("<p", "</p>"), ("<li>", "</li>")]
        {
            assert_eq!(count(&html, open), count(&html, close), "{open}");
        }
    }

    #[test]
    fn test_list_lines_outside_list_sections() {
        let html = format_recipe("Description:\nTwo ways:\n- baked\n- fried\nThen enjoy.");
        assert!(html.contains(">Two ways:</p><ul"));
        assert!(html.contains("<li>fried</li></ul><p"));
        assert!(html.ends_with("Then enjoy.</p>"));
    }

    #[test]
    fn test_raw_html_passes_through_by_default() {
        let html = format_recipe("Description: <b>bold</b> & co");
        assert!(html.contains("<b>bold</b> & co"));
    }

    #[test]
    fn test_escape_option() {
        let options = FormatOptions { escape_html: true };
        let html = format_recipe_with("Description: <script>x</script> & co", &options);
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt; &amp; co"));
        assert!(html.starts_with("<h3"));
    }

    #[tokio::test]
    async fn test_read_recipe_text_from_file() {
        let path = std::env::temp_dir().join("recipe-pantry-read-test.txt");
        tokio::fs::write(&path, CAKE).await.unwrap();

        let text = read_recipe_text(Some(&path)).await.unwrap();
        assert_eq!(text, CAKE);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_recipe_text_missing_file() {
        let path = std::env::temp_dir().join("recipe-pantry-no-such-recipe.txt");
        let err = read_recipe_text(Some(&path)).await.unwrap_err();
        assert!(matches!(err, PantryError::Io(_)));
    }

    #[test]
    fn test_collapse_closing_tags() {
        assert_eq!(collapse_closing_tags("</li></li></li>"), "</li>");
        assert_eq!(collapse_closing_tags("a</ul></ul>b</ol></ol></ol>"), "a</ul>b</ol>");
        assert_eq!(collapse_closing_tags("</li></ul></li>"), "</li></ul></li>");
        assert_eq!(collapse_closing_tags(""), "");
    }

    #[test]
    fn test_collapse_n_duplicates() {
        for n in 2..12 {
            let doubled = "</ol>".repeat(n);
            assert_eq!(collapse_closing_tags(&doubled), "</ol>");
        }
    }

    #[test]
    fn test_reformat_keeps_header_count() {
        let options = FormatOptions::default();
        let once = format_recipe_with(CAKE, &options);
        let twice = format_recipe_with(&once, &options);
        assert_eq!(count(&once, "<h3"), 3);
        assert_eq!(count(&twice, "<h3"), count(&once, "<h3"));
    }

    #[test]
    fn test_reformat_with_escaping_escapes_tags() {
        let options = FormatOptions { escape_html: true };
        let once = format_recipe_with(CAKE, &options);
        let twice = format_recipe_with(&once, &options);
        assert!(twice.contains("&lt;h3"));
        assert!(count(&twice, "<h3") < count(&once, "<h3"));
    }
}
