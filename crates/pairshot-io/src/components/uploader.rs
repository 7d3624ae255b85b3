//! One image slot: picker, drop zone, preview, and remove button.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdImagePlus, LdX};
use pairshot_core::{Slot, UploadCapture, UploadLimits, UploadedImage, capture};

use crate::browser_file::BrowserFile;

/// Props for the [`ImageUploader`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ImageUploaderProps {
    /// Which person this uploader is for.
    slot: Slot,
    /// Size limit for accepted files.
    limits: UploadLimits,
    /// The image the owner currently holds for this slot. The preview
    /// and remove button follow this, so they survive a remount.
    image: Option<UploadedImage>,
    /// Called with the new image, or `None` after removal.
    on_change: EventHandler<Option<UploadedImage>>,
}

/// A drop zone with a hidden file picker and an inline preview.
///
/// Only `image/*` files are accepted; anything else is ignored without
/// a message. If two files are picked in quick succession the later one
/// wins, whichever finishes reading first. The parent recreates the
/// component (by changing its key) to reset it.
#[component]
pub fn ImageUploader(props: ImageUploaderProps) -> Element {
    let on_change = props.on_change;
    let seed = props.image.clone();
    let mut uploader = use_signal(move || {
        UploadCapture::new(props.limits, move |image: Option<UploadedImage>| {
            on_change.call(image);
        })
        .with_image(seed)
    });

    // Shared by the picker and the drop handler. The read happens
    // outside the signal so no borrow is held across the await.
    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.into_iter().next() else {
            return;
        };
        let token = uploader.write().begin_read();
        let limits = uploader.peek().limits();
        let outcome = capture(&BrowserFile(file), limits).await;
        let _ = uploader.write().finish_read(token, outcome);
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        uploader.write().drag_leave();
        process_files(evt.files()).await;
    };

    let slot = props.slot;
    let preview = props.image.as_ref().map(UploadedImage::data_url);
    let (input_key, dragging) = {
        let state = uploader.read();
        (state.input_key(), state.is_dragging())
    };
    let has_image = preview.is_some();
    let zone_class = if dragging { "drop-zone dragging" } else { "drop-zone" };

    rsx! {
        div { class: "uploader",
            h3 { class: "uploader-title", "{slot.title()}" }

            label {
                r#for: slot.input_id(),
                class: zone_class,
                ondragenter: move |evt| {
                    evt.prevent_default();
                    uploader.write().drag_enter();
                },
                ondragover: move |evt| {
                    evt.prevent_default();
                    if !uploader.peek().is_dragging() {
                        uploader.write().drag_enter();
                    }
                },
                ondragleave: move |_| {
                    uploader.write().drag_leave();
                },
                ondrop: handle_drop,

                if let Some(src) = preview {
                    img {
                        class: "uploader-preview",
                        src: "{src}",
                        alt: "{slot.title()} preview",
                    }
                } else {
                    div { class: "uploader-placeholder",
                        Icon { width: 40, height: 40, icon: LdImagePlus }
                        p { "Click to upload or drag and drop" }
                        p { class: "hint", "Any image file" }
                    }
                }
            }

            // Keyed so a cleared input is recreated and the same file can
            // be picked again.
            for key in std::iter::once(input_key) {
                input {
                    key: "{key}",
                    id: slot.input_id(),
                    r#type: "file",
                    accept: "image/*",
                    class: "hidden",
                    onchange: handle_files,
                }
            }

            if has_image {
                button {
                    class: "remove-button",
                    r#type: "button",
                    aria_label: "Remove {slot.title()} image",
                    onclick: move |_| uploader.write().clear(),
                    Icon { width: 16, height: 16, icon: LdX }
                }
            }
        }
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pairshot_core::{Effect, Event, GenerationSession};

    use super::*;

    fn image(base64: &str, mime: &str) -> UploadedImage {
        UploadedImage {
            base64: base64.to_owned(),
            mime_type: mime.to_owned(),
            name: format!("{base64}.img"),
        }
    }

    /// Both uploaders wired to a session the way the app wires them,
    /// after the session went through Merge and Cancel.
    #[component]
    fn CancelledSetup() -> Element {
        let session = use_hook(|| {
            let mut session = GenerationSession::new();
            for (slot, image) in [
                (Slot::First, image("AAA", "image/png")),
                (Slot::Second, image("BBB", "image/jpeg")),
            ] {
                let _ = session.dispatch(Event::ImageChanged {
                    slot,
                    image: Some(image),
                });
            }
            assert!(matches!(session.dispatch(Event::Merge), Effect::StartMerge(_)));
            let _ = session.dispatch(Event::Cancel);
            session
        });

        rsx! {
            for slot in Slot::ALL {
                ImageUploader {
                    key: "{slot.input_id()}-{session.upload_epoch()}",
                    slot: slot,
                    limits: UploadLimits::default(),
                    image: session.image(slot).cloned(),
                    on_change: move |_| {},
                }
            }
        }
    }

    #[component]
    fn EmptySlot() -> Element {
        rsx! {
            ImageUploader {
                slot: Slot::Second,
                limits: UploadLimits::default(),
                image: None,
                on_change: move |_| {},
            }
        }
    }

    fn render(app: fn() -> Element) -> String {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        dioxus_ssr::render(&dom)
    }

    #[test]
    fn previews_survive_a_cancelled_merge() {
        let html = render(CancelledSetup);

        assert!(html.contains("data:image/png;base64,AAA"), "{html}");
        assert!(html.contains("data:image/jpeg;base64,BBB"), "{html}");
        assert!(!html.contains("Click to upload or drag and drop"), "{html}");
        assert_eq!(html.matches("remove-button").count(), 2, "{html}");
    }

    #[test]
    fn empty_slot_shows_placeholder_without_remove() {
        let html = render(EmptySlot);

        assert!(html.contains("Click to upload or drag and drop"), "{html}");
        assert!(!html.contains("remove-button"), "{html}");
        assert!(html.contains("uploader2"), "{html}");
    }
}
