//! Prompt construction for memo generation.

use std::fmt::Write;

use crate::presets::{Genre, ImageSize, Theme};

/// Builds the model prompt for a new memo image.
///
/// Deterministic in its inputs. The content section and its verbatim rule
/// appear only for non-blank content; the instruction section only for a
/// non-blank instruction. A `general` (or absent) genre keeps the generic
/// "study notes" subject.
#[must_use]
pub fn build_prompt(
    content: &str,
    theme: &Theme,
    size: ImageSize,
    instruction: Option<&str>,
    genre: Option<&Genre>,
) -> String {
    let subject = genre
        .filter(|genre| !genre.is_general())
        .map_or("study notes", |genre| genre.prompt_description);
    let has_content = !content.trim().is_empty();

    let mut prompt = String::with_capacity(1024 + content.len());
    let _ = write!(
        prompt,
        "Create {} image of a handwritten {subject} for social media (like Twitter/X). \
         The image should look like someone's real study notes - casual, authentic, and visually engaging.\n\
         \n\
         Visual style: {}\n",
        size.prompt_description(),
        theme.prompt_description,
    );

    if has_content {
        let _ = write!(
            prompt,
            "\nContent to include in the memo (write this text EXACTLY as provided, \
             do not change or omit any characters):\n{content}\n"
        );
    }

    prompt.push_str("\nImportant rules:\n- All text must be handwritten style, NOT typed/digital font");
    if has_content {
        prompt.push_str(
            "\n- Write the text EXACTLY as provided above - every word, every character must \
             appear accurately including Japanese characters",
        );
    }
    prompt.push_str(
        "\n- Use visual hierarchy: make key English words/phrases bigger and bolder\
         \n- Add hand-drawn decorations like underlines, circles, arrows, stars, or simple doodles to make it eye-catching\
         \n- The overall feel should be like a real student's study notes that someone would want to save or share\
         \n- Make it visually dense but not cluttered - the kind of aesthetic study notes that go viral on social media\
         \n- Keep the layout natural and organic, not rigid or grid-like",
    );

    if let Some(instruction) = instruction.map(str::trim).filter(|i| !i.is_empty()) {
        let _ = write!(
            prompt,
            "\n\nAdditional instructions from the user (follow these but do NOT include \
             this instruction text in the image):\n{instruction}"
        );
    }

    prompt
}
