//! Mini-app manifest served at `/.well-known/farcaster.json`.
//!
//! Every field is optional. Unset or empty values are left out of the
//! document, so a bare config still answers with a valid skeleton.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const FRAME_VERSION: &str = "1";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Signed account association proving domain ownership.
    pub header: Option<String>,
    pub payload: Option<String>,
    pub signature: Option<String>,

    pub name: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub splash_image_url: Option<String>,
    pub splash_background_color: Option<String>,
    /// Public origin of the app. Also the base of the webhook URL.
    pub home_url: Option<String>,
    pub primary_category: Option<String>,
    pub hero_image_url: Option<String>,
    pub tagline: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image_url: Option<String>,
    pub screenshot_urls: Vec<String>,
    pub tags: Vec<String>,
}

impl ManifestConfig {
    pub fn to_document(&self) -> Value {
        let mut association = Map::new();
        insert_text(&mut association, "header", &self.header);
        insert_text(&mut association, "payload", &self.payload);
        insert_text(&mut association, "signature", &self.signature);

        let webhook_url = self
            .home_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| format!("{}/api/webhook", url.trim_end_matches('/')));

        let mut frame = Map::new();
        frame.insert("version".into(), Value::from(FRAME_VERSION));
        insert_text(&mut frame, "name", &self.name);
        insert_text(&mut frame, "subtitle", &self.subtitle);
        insert_text(&mut frame, "description", &self.description);
        insert_list(&mut frame, "screenshotUrls", &self.screenshot_urls);
        insert_text(&mut frame, "iconUrl", &self.icon_url);
        insert_text(&mut frame, "splashImageUrl", &self.splash_image_url);
        insert_text(&mut frame, "splashBackgroundColor", &self.splash_background_color);
        insert_text(&mut frame, "homeUrl", &self.home_url);
        insert_text(&mut frame, "webhookUrl", &webhook_url);
        insert_text(&mut frame, "primaryCategory", &self.primary_category);
        insert_list(&mut frame, "tags", &self.tags);
        insert_text(&mut frame, "heroImageUrl", &self.hero_image_url);
        insert_text(&mut frame, "tagline", &self.tagline);
        insert_text(&mut frame, "ogTitle", &self.og_title);
        insert_text(&mut frame, "ogDescription", &self.og_description);
        insert_text(&mut frame, "ogImageUrl", &self.og_image_url);

        let mut doc = Map::new();
        doc.insert("accountAssociation".into(), Value::Object(association));
        doc.insert("frame".into(), Value::Object(frame));
        Value::Object(doc)
    }
}

fn insert_text(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
        map.insert(key.into(), Value::from(value));
    }
}

fn insert_list(map: &mut Map<String, Value>, key: &str, values: &[String]) {
    if !values.is_empty() {
        map.insert(key.into(), Value::from(values.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_is_a_skeleton() {
        let doc = ManifestConfig::default().to_document();
        assert_eq!(doc, json!({"accountAssociation": {}, "frame": {"version": "1"}}));
    }

    #[test]
    fn blank_fields_are_dropped() {
        let config = ManifestConfig {
            header: Some("eyJoZWFkZXIi".into()),
            name: Some("Folio".into()),
            subtitle: Some("  ".into()),
            home_url: Some("https://folio.example/".into()),
            tags: vec!["books".into()],
            ..ManifestConfig::default()
        };
        let doc = config.to_document();
        assert_eq!(doc["accountAssociation"], json!({"header": "eyJoZWFkZXIi"}));
        assert_eq!(
            doc["frame"],
            json!({
                "version": "1",
                "name": "Folio",
                "homeUrl": "https://folio.example/",
                "webhookUrl": "https://folio.example/api/webhook",
                "tags": ["books"],
            })
        );
    }
}
