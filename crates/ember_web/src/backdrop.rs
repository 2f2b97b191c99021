//! Static backdrop beneath the ember canvas.
//!
//! The container gets a cover-fit image multiplied with a dark red vertical
//! gradient; the canvas is pinned over it, full-size and click-through, so
//! a transparent clear reveals the backdrop.

/// Backdrop styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backdrop {
    /// Background image URL, if any.
    pub image_url: Option<String>,
    /// Gradient colour at the top edge.
    pub gradient_top: String,
    /// Gradient colour at the bottom edge.
    pub gradient_bottom: String,
    /// CSS blend mode between image and gradient.
    pub blend_mode: String,
}

impl Default for Backdrop {
    fn default() -> Self {
        Self {
            image_url: None,
            gradient_top: "rgba(20, 0, 0, 1)".to_string(),
            gradient_bottom: "rgba(40, 0, 0, 0.9)".to_string(),
            blend_mode: "multiply".to_string(),
        }
    }
}

impl Backdrop {
    /// Backdrop over the given image.
    #[must_use]
    pub fn with_image(image_url: impl Into<String>) -> Self {
        Self {
            image_url: Some(image_url.into()),
            ..Self::default()
        }
    }

    /// CSS declarations for the element that holds the canvas.
    #[must_use]
    pub fn container_css(&self) -> Vec<(&'static str, String)> {
        let gradient = format!(
            "linear-gradient(to bottom, {}, {})",
            self.gradient_top, self.gradient_bottom
        );
        let image = match &self.image_url {
            Some(url) => format!("url(\"{}\"), {gradient}", url.replace('"', "%22")),
            None => gradient,
        };

        vec![
            ("position", "relative".to_string()),
            ("width", "100%".to_string()),
            ("height", "100vh".to_string()),
            ("background-image", image),
            ("background-size", "cover".to_string()),
            ("background-position", "center".to_string()),
            ("background-blend-mode", self.blend_mode.clone()),
        ]
    }

    /// CSS declarations for the canvas itself.
    #[must_use]
    pub fn canvas_css() -> Vec<(&'static str, String)> {
        vec![
            ("position", "absolute".to_string()),
            ("top", "0".to_string()),
            ("left", "0".to_string()),
            ("width", "100%".to_string()),
            ("height", "100%".to_string()),
            ("pointer-events", "none".to_string()),
        ]
    }
}

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::{HtmlCanvasElement, HtmlElement};

    use super::Backdrop;
    use crate::error::WebError;

    fn apply_declarations(
        element: &HtmlElement,
        declarations: &[(&'static str, String)],
    ) -> Result<(), WebError> {
        let style = element.style();
        for (name, value) in declarations {
            style.set_property(name, value)?;
        }
        Ok(())
    }

    impl Backdrop {
        /// Styles the canvas and its parent element.
        ///
        /// # Errors
        ///
        /// Returns [`WebError::Js`] if the browser rejects a style write.
        pub fn apply(&self, canvas: &HtmlCanvasElement) -> Result<(), WebError> {
            apply_declarations(canvas, &Self::canvas_css())?;
            if let Some(parent) = canvas
                .parent_element()
                .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
            {
                apply_declarations(&parent, &self.container_css())?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(decls: &'a [(&'static str, String)], name: &str) -> &'a str {
        decls
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_gradient_only_backdrop() {
        let css = Backdrop::default().container_css();
        assert_eq!(
            value(&css, "background-image"),
            "linear-gradient(to bottom, rgba(20, 0, 0, 1), rgba(40, 0, 0, 0.9))"
        );
        assert_eq!(value(&css, "background-blend-mode"), "multiply");
    }

    #[test]
    fn test_image_sits_above_gradient() {
        let css = Backdrop::with_image("/bgimg1.jpg").container_css();
        assert!(value(&css, "background-image").starts_with("url(\"/bgimg1.jpg\"), linear-gradient("));
    }

    #[test]
    fn test_image_url_cannot_break_out() {
        let css = Backdrop::with_image("a\"b").container_css();
        assert!(value(&css, "background-image").starts_with("url(\"a%22b\")"));
    }

    #[test]
    fn test_canvas_is_click_through() {
        let css = Backdrop::canvas_css();
        assert_eq!(value(&css, "pointer-events"), "none");
        assert_eq!(value(&css, "position"), "absolute");
    }
}
