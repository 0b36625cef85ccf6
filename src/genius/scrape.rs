use std::sync::LazyLock;

use regex::Regex;

static DIV_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<div\b[^>]*>").expect("valid div pattern"));
static DIV_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?div\b[^>]*>").expect("valid div pattern"));
static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*["']([^"']*)["']"#).expect("valid class pattern")
});
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</?(?:div|p)\b[^>]*>").expect("valid line break pattern")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid entity pattern"));

/// How a lyrics container is recognised on a song page.
#[derive(Debug, Clone, Copy)]
enum Container {
    DataAttribute(&'static str),
    Class(&'static str),
}

/// Known lyrics containers, most specific first.
const CONTAINERS: [Container; 4] = [
    Container::DataAttribute("data-lyrics-container=\"true\""),
    Container::Class("Lyrics__Container"),
    Container::Class("lyrics"),
    Container::Class("Lyrics__Root"),
];

/// Extracts the plain lyrics text of a song page.
///
/// Uses the first container kind that occurs on the page and joins all of
/// its blocks. Returns `None` when no known container is present.
pub fn extract_lyrics(html: &str) -> Option<String> {
    CONTAINERS.iter().find_map(|container| {
        let blocks = container_blocks(html, *container);
        if blocks.is_empty() {
            return None;
        }

        let text = blocks
            .iter()
            .map(|block| block_to_text(block))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        Some(text)
    })
}

fn container_blocks(html: &str, container: Container) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut consumed = 0;

    for open in DIV_OPEN.find_iter(html) {
        if open.start() < consumed || !is_container(open.as_str(), container) {
            continue;
        }

        if let Some((inner_end, close_end)) = matching_close(html, open.end()) {
            blocks.push(&html[open.end()..inner_end]);
            consumed = close_end;
        }
    }

    blocks
}

fn is_container(tag: &str, container: Container) -> bool {
    match container {
        Container::DataAttribute(attr) => tag.contains(attr),
        Container::Class(name) => CLASS_ATTR.captures(tag).is_some_and(|caps| {
            caps[1].split_whitespace().any(|class| {
                class == name
                    || class
                        .strip_prefix(name)
                        .is_some_and(|rest| rest.starts_with('-'))
            })
        }),
    }
}

/// Finds the `</div>` closing the div whose content starts at `from`.
///
/// Returns the byte offsets of the start and the end of that closing tag.
fn matching_close(html: &str, from: usize) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    for tag in DIV_ANY.find_iter(&html[from..]) {
        let text = tag.as_str();
        if text.starts_with("</") {
            depth -= 1;
            if depth == 0 {
                return Some((from + tag.start(), from + tag.end()));
            }
        } else if !text.ends_with("/>") {
            depth += 1;
        }
    }
    None
}

/// Line breaks and block tags become newlines so words on either side of
/// them stay separate tokens. Inline tags are dropped.
fn block_to_text(block: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(block, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    let decoded = decode_html_entities(&stripped);

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_html_entities(input: &str) -> String {
    let named = input
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ");

    let numeric = NUMERIC_ENTITY.replace_all(&named, |caps: &regex::Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    // last, so "&amp;lt;" stays "&lt;"
    numeric.replace("&amp;", "&")
}
