//! Prompt text sent alongside the two photos.

/// Build the generation prompt for a background instruction.
///
/// The instruction is the preset's backdrop description; everything else
/// is fixed so the model treats the two images as separate people to be
/// composed side by side.
#[must_use]
pub fn merge_prompt(instruction: &str) -> String {
    let background = instruction.trim();
    format!(
        "Create a single photorealistic photograph of the person in the first image \
         and the person in the second image standing together as best friends. \
         Place them side by side in front of a {background}. \
         Keep each person's face, hair, body, and clothing faithful to their original photo. \
         Match lighting, color, and scale so they look like they were photographed together \
         in the same studio session. Output only the final image."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PresetId;

    #[test]
    fn instruction_is_embedded_once() {
        let prompt = merge_prompt(PresetId::Pastel.instruction());
        assert_eq!(prompt.matches("soft, pastel blue studio background").count(), 1);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let prompt = merge_prompt("  brick wall \n");
        assert!(prompt.contains("in front of a brick wall."));
    }
}
