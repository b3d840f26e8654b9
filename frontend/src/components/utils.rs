use super::super::{Model, ToastKind};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

/// Shortens long file names for buttons, keeping the first `max_chars - 3` characters.
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() > max_chars {
        let kept: String = name.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        name.to_string()
    }
}

pub fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

pub fn render_toast(model: &Model) -> Html {
    if let Some(toast) = &model.toast {
        let (class, icon) = match toast.kind {
            ToastKind::Success => ("toast success", "fa-solid fa-circle-check"),
            ToastKind::Error => ("toast error", "fa-solid fa-circle-exclamation"),
        };
        html! {
            <div class={classes!(class, "show")} key={toast.id.to_string()}>
                <i class={icon}></i>
                <p>{ &toast.message }</p>
            </div>
        }
    } else {
        html! {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_are_untouched() {
        assert_eq!(truncate_name("cat.jpg", 20), "cat.jpg");
    }

    #[test]
    fn long_names_are_cut_on_char_boundaries() {
        assert_eq!(truncate_name("a_very_long_file_name.png", 20), "a_very_long_file_...");
        assert_eq!(truncate_name("猫猫猫猫猫猫.png", 6), "猫猫猫...");
    }

    #[test]
    fn percentages_use_two_decimals() {
        assert_eq!(percent(0.8532), "85.32%");
        assert_eq!(percent(1.0), "100.00%");
    }
}
