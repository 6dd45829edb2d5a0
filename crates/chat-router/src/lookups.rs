//! Lookup collaborators for the non-device intents

use crate::Result;
use async_trait::async_trait;
use time::OffsetDateTime;

/// Location-keyed weather collaborator. Calls are expected to carry a short
/// bounded timeout; failure degrades to a service-unavailable reply.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current(&self, location: &str) -> Result<String>;
}

/// Keyword search links across the configured shopping sites. Pure link
/// templating, no network.
pub struct ShoppingLinks {
    sites: Vec<(String, String)>,
}

impl Default for ShoppingLinks {
    fn default() -> Self {
        Self {
            sites: vec![
                (
                    "momo".to_string(),
                    "https://www.momoshop.com.tw/search/searchShop.jsp?keyword={q}".to_string(),
                ),
                (
                    "PChome".to_string(),
                    "https://ecshweb.pchome.com.tw/search/v3.3/?q={q}".to_string(),
                ),
                (
                    "蝦皮".to_string(),
                    "https://shopee.tw/search?keyword={q}".to_string(),
                ),
            ],
        }
    }
}

impl ShoppingLinks {
    /// Sites given as `(display name, URL template containing {q})` pairs.
    pub fn new(sites: Vec<(String, String)>) -> Self {
        Self { sites }
    }

    pub fn links(&self, keyword: &str) -> Vec<(String, String)> {
        let encoded = urlencoding::encode(keyword);
        self.sites
            .iter()
            .map(|(name, template)| (name.clone(), template.replace("{q}", &encoded)))
            .collect()
    }
}

/// Templated calendar-entry link builder.
pub struct CalendarLinks {
    template: String,
}

impl Default for CalendarLinks {
    fn default() -> Self {
        Self {
            template:
                "https://calendar.google.com/calendar/render?action=TEMPLATE&text={q}&dates={d}/{d}"
                    .to_string(),
        }
    }
}

impl CalendarLinks {
    /// Template with `{q}` for the event text and `{d}` for today's date.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn build(&self, query: &str) -> String {
        let date = OffsetDateTime::now_utc().date();
        let today = format!(
            "{:04}{:02}{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        );
        self.template
            .replace("{q}", &urlencoding::encode(query))
            .replace("{d}", &today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shopping_links_encode_the_keyword() {
        let links = ShoppingLinks::default().links("咖啡 豆");
        assert_eq!(links.len(), 3);
        for (_, url) in &links {
            assert!(url.contains("%E5%92%96%E5%95%A1%20%E8%B1%86"), "{url}");
        }
    }

    #[test]
    fn calendar_link_carries_query_and_date() {
        let link = CalendarLinks::default().build("dentist");
        assert!(link.contains("text=dentist"));
        assert!(link.contains("dates="));
        assert!(!link.contains("{d}"));
    }
}
