/// Section markers recognized in generated recipe text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Description,
    PreparationTime,
    CookingTime,
    Servings,
    Ingredients,
    Instructions,
    Tips,
}

/// Kind of list container a section or list line calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Description,
        Section::PreparationTime,
        Section::CookingTime,
        Section::Servings,
        Section::Ingredients,
        Section::Instructions,
        Section::Tips,
    ];

    /// Canonical spelling, also used as the header label
    pub fn keyword(self) -> &'static str {
        match self {
            Section::Description => "Description",
            Section::PreparationTime => "Preparation Time",
            Section::CookingTime => "Cooking Time",
            Section::Servings => "Servings",
            Section::Ingredients => "Ingredients",
            Section::Instructions => "Instructions",
            Section::Tips => "Tips",
        }
    }

    /// List container opened by the section; `None` for prose sections
    pub fn list_kind(self) -> Option<ListKind> {
        match self {
            Section::Ingredients | Section::Tips => Some(ListKind::Unordered),
            Section::Instructions => Some(ListKind::Ordered),
            _ => None,
        }
    }

    /// Match a section marker at the start of a trimmed line.
    ///
    /// The keyword is compared case-insensitively and must be followed by
    /// the end of the line or a colon. Returns the section and whatever
    /// follows the colon.
    pub fn match_marker(line: &str) -> Option<(Section, &str)> {
        Section::ALL.into_iter().find_map(|section| {
            let keyword = section.keyword();
            let head = line.get(..keyword.len())?;
            if !head.eq_ignore_ascii_case(keyword) {
                return None;
            }

            let rest = line[keyword.len()..].trim_start();
            if rest.is_empty() {
                Some((section, rest))
            } else {
                rest.strip_prefix(':').map(|r| (section, r.trim()))
            }
        })
    }
}

/// Split a `- item` or `N. item` line into its list kind and text
pub fn match_list_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(rest) = line.strip_prefix('-') {
        return rest
            .starts_with(char::is_whitespace)
            .then(|| (ListKind::Unordered, rest.trim()));
    }

    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    rest.starts_with(char::is_whitespace)
        .then(|| (ListKind::Ordered, rest.trim()))
}

/// `For the sauce:` style sub-heading inside the ingredient block
pub fn is_sub_heading(line: &str) -> bool {
    line.get(..8)
        .is_some_and(|head| head.eq_ignore_ascii_case("for the "))
        && line.ends_with(':')
}
