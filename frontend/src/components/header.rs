use shared::category::PACS_DOMAINS;
use shared::{CategoryTable, TranslationProvider, Translator};
use yew::prelude::*;

/// Renders the application header with the categories and domains the models know.
pub fn render_header(t: &Translator, categories: &CategoryTable) -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-brain"></i>{ format!(" {}", t.translate("logoText")) }</h1>
            <p class="subtitle">{ t.translate("subtitle") }</p>
            <div class="supported-categories">
                <h3>{ t.translate("supportedCategories") }</h3>
                <div class="category-tags">
                    { for categories.iter().map(|category| html! {
                        <span class="category-tag" key={category.id.to_string()}>{ t.category_label(category) }</span>
                    })}
                </div>
                <div class="domain-tags">
                    { for PACS_DOMAINS.iter().map(|domain| html! {
                        <span class="domain-tag" key={*domain}>{ t.domain_label(domain) }</span>
                    })}
                </div>
            </div>
        </header>
    }
}
