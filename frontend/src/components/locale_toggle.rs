use super::super::Model;
use super::super::Msg;
use shared::Locale;
use yew::html::Scope;
use yew::prelude::*;

pub fn render_locale_toggle(locale: Locale, label: String, link: &Scope<Model>) -> Html {
    let next = match locale {
        Locale::En => Locale::Zh,
        Locale::Zh => Locale::En,
    };

    html! {
        <button
            id="language-toggle"
            class="language-toggle"
            onclick={link.callback(move |_| Msg::SetLocale(next))}
            title={ format!("Switch to {}", next) }
        >
            <i class="fa-solid fa-language"></i>{ format!(" {}", label) }
        </button>
    }
}

/// Mirrors the active locale onto the document title and `lang` attribute.
pub fn apply_document_locale(locale: Locale, title: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    document.set_title(title);
    if let Some(root) = document.document_element() {
        let lang = match locale {
            Locale::En => "en",
            Locale::Zh => "zh-CN",
        };
        if let Err(e) = root.set_attribute("lang", lang) {
            log::warn!("Failed to set document language: {:?}", e);
        }
    }
}
