//! Row of background preset tiles.

use dioxus::prelude::*;
use pairshot_core::PresetId;

/// Props for the [`BackgroundPicker`] component.
#[derive(Props, Clone, PartialEq)]
pub struct BackgroundPickerProps {
    /// Currently selected preset.
    selected: PresetId,
    /// Callback fired when a tile is clicked.
    on_select: EventHandler<PresetId>,
}

/// One tile per preset, each showing a color swatch and name. The
/// selected tile is highlighted. Selecting only records the choice.
#[component]
pub fn BackgroundPicker(props: BackgroundPickerProps) -> Element {
    rsx! {
        div { class: "preset-grid", role: "group", aria_label: "Background",
            for preset in PresetId::ALL {
                {render_tile(preset, props.selected == preset, props.on_select)}
            }
        }
    }
}

fn render_tile(preset: PresetId, is_selected: bool, on_select: EventHandler<PresetId>) -> Element {
    let class = if is_selected {
        "preset-tile selected"
    } else {
        "preset-tile"
    };

    rsx! {
        button {
            id: "preset-{preset.id()}",
            class: "{class}",
            r#type: "button",
            title: "{preset.instruction()}",
            "aria-pressed": "{is_selected}",
            onclick: move |_| on_select.call(preset),

            span {
                class: "preset-swatch",
                style: "background-color: {preset.swatch()}",
            }
            span { class: "preset-name", "{preset.name()}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[component]
    fn Picker() -> Element {
        rsx! {
            BackgroundPicker { selected: PresetId::Pastel, on_select: move |_| {} }
        }
    }

    #[test]
    fn only_the_selected_tile_is_pressed() {
        let mut dom = VirtualDom::new(Picker);
        dom.rebuild_in_place();
        let html = dioxus_ssr::render(&dom);

        for preset in PresetId::ALL {
            assert!(html.contains(&format!("preset-{}", preset.id())), "{html}");
            assert!(html.contains(preset.name()), "{html}");
        }
        assert_eq!(html.matches("aria-pressed=\"true\"").count(), 1, "{html}");
        assert_eq!(html.matches("aria-pressed=\"false\"").count(), 3, "{html}");
    }
}
