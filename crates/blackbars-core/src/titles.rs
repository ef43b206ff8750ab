/// The window titles that trigger the backdrop.
///
/// Built once at startup and never mutated. Matching is case-sensitive
/// exact equality: games that append build numbers or FPS counters to
/// their title need every variant listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitoredTitles {
    titles: Vec<String>,
}

impl MonitoredTitles {
    /// Builds the set, keeping first-seen order and dropping empty
    /// strings and duplicates.
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for title in titles {
            let title = title.into();
            // An empty title would match every untitled foreground window.
            if title.is_empty() || unique.contains(&title) {
                continue;
            }
            unique.push(title);
        }
        Self { titles: unique }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.iter().any(|t| t == title)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
