//! Result page body: progress, error, or the merged photo.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdRefreshCw};
use pairshot_core::DownloadArtifact;

/// Props for the [`ResultPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultPanelProps {
    /// A request is in flight.
    loading: bool,
    /// Generation error to show instead of a photo.
    error: Option<String>,
    /// The merged photo as base64 PNG.
    image: Option<String>,
    /// Set when the last download attempt failed.
    download_error: Option<String>,
    /// "Cancel" while loading.
    on_cancel: EventHandler<()>,
    /// "Download" under the photo.
    on_download: EventHandler<()>,
    /// "Try again" / "Create another".
    on_start_over: EventHandler<()>,
}

/// Shows exactly one of: a spinner with a cancel button, an error with
/// a retry button, or the merged photo with download and restart.
#[component]
pub fn ResultPanel(props: ResultPanelProps) -> Element {
    if props.loading {
        return rsx! {
            div { class: "result-panel", aria_busy: "true",
                div { class: "spinner" }
                div { class: "status",
                    p { class: "status-title", "Generating the image..." }
                    p { class: "hint", "Our AI is working its magic. This might take a moment." }
                }
                button {
                    class: "button secondary",
                    r#type: "button",
                    onclick: move |_| props.on_cancel.call(()),
                    "Cancel"
                }
            }
        };
    }

    if let Some(error) = props.error {
        return rsx! {
            div { class: "result-panel",
                div { class: "error", role: "alert",
                    strong { "Generation Failed! " }
                    span { "{error}" }
                }
                button {
                    class: "button primary",
                    r#type: "button",
                    onclick: move |_| props.on_start_over.call(()),
                    Icon { width: 18, height: 18, icon: LdRefreshCw }
                    "Try Again"
                }
            }
        };
    }

    let Some(image) = props.image else {
        return rsx! {};
    };
    let src = DownloadArtifact::data_url_for(&image);

    rsx! {
        div { class: "result-panel",
            h2 { class: "result-title", "Your Merged Masterpiece!" }
            img { class: "merged-photo", src: "{src}", alt: "Merged best friends photo" }

            if let Some(ref e) = props.download_error {
                p { class: "error", role: "alert", "Download failed: {e}" }
            }

            div { class: "actions",
                button {
                    class: "button primary",
                    r#type: "button",
                    onclick: move |_| props.on_download.call(()),
                    Icon { width: 18, height: 18, icon: LdDownload }
                    "Download Image"
                }
                button {
                    class: "button secondary",
                    r#type: "button",
                    onclick: move |_| props.on_start_over.call(()),
                    "Create Another"
                }
            }
        }
    }
}
