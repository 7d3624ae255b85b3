use dioxus::logger::tracing::{self, Level};
use dioxus::prelude::*;
use pairshot_core::{
    Effect, Event, GenerationSession, MergeConfig, Page, PresetId, Slot, UploadLimits,
    UploadedImage, run_merge,
};
use pairshot_io::{BackgroundPicker, GeminiMergeService, ImageUploader, ResultPanel};

fn main() {
    // Fails only if a subscriber is already installed.
    let _ = dioxus::logger::init(Level::INFO);
    dioxus::launch(app);
}

/// Root application component.
///
/// Owns the [`GenerationSession`] in a signal. Every UI event goes
/// through `drive`, which dispatches into the session and runs any
/// resulting merge request in a spawned task.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let config = use_hook(MergeConfig::from_build_env);
    let limits = UploadLimits::from(&config);
    let service = use_signal(|| GeminiMergeService::new(config.clone()));
    let mut session = use_signal(GenerationSession::new);
    let mut download_error = use_signal(|| Option::<String>::None);

    use_hook(|| {
        if config.api_key.is_none() {
            tracing::warn!("no API key configured; merges will fail until PAIRSHOT_API_KEY is set at build time");
        }
    });

    // --- Session driver ---
    // The completion is dispatched like any other event; the session
    // itself discards it if the request was cancelled or superseded.
    let mut drive = move |event: Event| {
        let effect = session.write().dispatch(event);
        match effect {
            Effect::None => {}
            Effect::StartMerge(request) => {
                let service = service.peek().clone();
                spawn(async move {
                    let finished = run_merge(&service, request).await;
                    let _ = session.write().dispatch(finished);
                });
            }
        }
    };

    let on_image = move |slot: Slot| {
        move |image: Option<UploadedImage>| drive(Event::ImageChanged { slot, image })
    };
    let on_preset = move |preset: PresetId| drive(Event::PresetSelected(preset));
    let on_merge = move |_: MouseEvent| drive(Event::Merge);
    let on_cancel = move |()| drive(Event::Cancel);
    let on_start_over = move |()| {
        download_error.set(None);
        drive(Event::StartOver);
    };
    let on_download = move |()| {
        let outcome = session.read().download();
        match outcome {
            Ok(Some(artifact)) => match pairshot_io::save_artifact(&artifact) {
                Ok(()) => download_error.set(None),
                Err(e) => {
                    tracing::warn!(error = %e, "download failed");
                    download_error.set(Some(e.to_string()));
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "merged image could not be decoded");
                download_error.set(Some(e.to_string()));
            }
        }
    };

    let (page, loading, error, merged, preset, can_merge, epoch) = {
        let state = session.read();
        (
            state.page(),
            state.is_loading(),
            state.error().map(str::to_owned),
            state.merged_image().map(str::to_owned),
            state.preset(),
            state.can_merge(),
            state.upload_epoch(),
        )
    };

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "app",
            header { class: "app-header",
                h1 {
                    "Best Friends "
                    span { class: "accent", "Photo Merge" }
                }
                p { class: "tagline",
                    "Upload two photos and watch our AI bring them together as best friends in a studio shot!"
                }
            }

            main {
                {match page {
                    Page::Setup => rsx! {
                        div { class: "tip", role: "note",
                            p { class: "tip-title", "Pro Tip" }
                            p { "For best results, please upload full-body pictures of each person." }
                        }

                        div { class: "uploaders",
                            // Keyed by the upload epoch so "start over" recreates
                            // both uploaders empty. The images come from the
                            // session so they are still shown after a cancel.
                            for slot in Slot::ALL {
                                ImageUploader {
                                    key: "{slot.input_id()}-{epoch}",
                                    slot: slot,
                                    limits: limits,
                                    image: session.read().image(slot).cloned(),
                                    on_change: on_image(slot),
                                }
                            }
                        }

                        section { class: "card",
                            h3 { class: "card-title", "Choose a Background" }
                            BackgroundPicker { selected: preset, on_select: on_preset }
                        }

                        div { class: "merge-row",
                            button {
                                class: "button primary large",
                                r#type: "button",
                                disabled: !can_merge,
                                onclick: on_merge,
                                "Create Best Friends Photo"
                            }
                            if let Some(ref message) = error {
                                div { class: "error", role: "alert",
                                    strong { "Oh no! " }
                                    span { "{message}" }
                                }
                            }
                        }
                    },
                    Page::Result => rsx! {
                        ResultPanel {
                            loading: loading,
                            error: error.clone(),
                            image: merged.clone(),
                            download_error: download_error(),
                            on_cancel: on_cancel,
                            on_download: on_download,
                            on_start_over: on_start_over,
                        }
                    },
                }}
            }
        }
    }
}
