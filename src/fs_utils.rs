use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use tokio::fs;

use crate::constants::{FILE_NAME_PROMPT_CHARS, OUTPUT_EXTENSION};
use crate::error::{GenerationError, StartupError};
use crate::models::PromptEntry;

/// Creates the directory and any missing parents. Fails if `path` exists but is not a directory.
pub async fn ensure_output_dir(path: &Path) -> Result<PathBuf, StartupError> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| StartupError::OutputDir {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(path.to_path_buf())
}

pub async fn read_prompt_file(path: &Path) -> Result<Vec<PromptEntry>, StartupError> {
    let contents = fs::read_to_string(path)
        .await
        .map_err(|source| StartupError::PromptFile {
            path: path.to_path_buf(),
            source,
        })?;

    let prompts = parse_prompts(&contents);
    if prompts.is_empty() {
        return Err(StartupError::NoPrompts {
            path: path.to_path_buf(),
        });
    }
    Ok(prompts)
}

/// One prompt per non-blank line, trimmed, numbered from 1 in file order.
pub fn parse_prompts(contents: &str) -> Vec<PromptEntry> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(position, text)| PromptEntry {
            index: position + 1,
            text: text.to_string(),
        })
        .collect()
}

pub fn sanitize_file_name_fragment(prompt: &str) -> String {
    let kept: String = prompt
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .take(FILE_NAME_PROMPT_CHARS)
        .collect();
    kept.trim_end().to_string()
}

pub fn output_file_name(prompt: &PromptEntry) -> String {
    format!(
        "{:03}_{}.{}",
        prompt.index,
        sanitize_file_name_fragment(&prompt.text),
        OUTPUT_EXTENSION
    )
}

/// Re-encodes as PNG regardless of what the service sent. Overwrites existing files.
pub async fn save_png(image: &DynamicImage, path: &Path) -> Result<(), GenerationError> {
    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, ImageFormat::Png)
        .map_err(|err| GenerationError::Write {
            path: path.to_path_buf(),
            reason: format!("PNG encoding failed: {}", err),
        })?;

    fs::write(path, encoded.into_inner())
        .await
        .map_err(|err| GenerationError::Write {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(index: usize, text: &str) -> PromptEntry {
        PromptEntry {
            index,
            text: text.to_string(),
        }
    }

    #[test]
    fn blank_lines_are_skipped_and_order_kept() {
        let prompts = parse_prompts("  first  \n\n\t\nsecond\r\n   \nthird");
        let texts: Vec<&str> = prompts.iter().map(|p| p.text.as_str()).collect();
        let indexes: Vec<usize> = prompts.iter().map(|p| p.index).collect();

        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn file_name_is_padded_and_sanitized() {
        assert_eq!(
            output_file_name(&entry(1, "a dragon on a cliff")),
            "001_a dragon on a cliff.png"
        );
        assert_eq!(
            output_file_name(&entry(42, "hero's \"last\" stand: dawn/dusk!")),
            "042_heros last stand dawndusk.png"
        );
        assert_eq!(output_file_name(&entry(1000, "x")), "1000_x.png");
    }

    #[test]
    fn file_name_fragment_is_capped_and_right_trimmed() {
        let long = "word ".repeat(30);
        let fragment = sanitize_file_name_fragment(&long);
        assert!(fragment.chars().count() <= FILE_NAME_PROMPT_CHARS);
        assert!(!fragment.ends_with(' '));

        assert_eq!(sanitize_file_name_fragment("under_score-dash  "), "under_score-dash");
        assert_eq!(sanitize_file_name_fragment("日本の城"), "");
    }

    #[test]
    fn space_at_the_cut_is_trimmed() {
        let prompt = format!("{} b", "a".repeat(49));
        assert_eq!(sanitize_file_name_fragment(&prompt), "a".repeat(49));

        let exact = format!("{}b", "a".repeat(49));
        assert_eq!(sanitize_file_name_fragment(&format!("{exact} tail")), exact);
    }

    #[tokio::test]
    async fn missing_prompt_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = read_prompt_file(&dir.path().join("absent.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, StartupError::PromptFile { .. }));
    }

    #[tokio::test]
    async fn whitespace_only_prompt_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prompts.txt");
        std::fs::write(&path, "\n   \n\t\n").unwrap();

        let err = read_prompt_file(&path).await.unwrap_err();
        assert!(matches!(err, StartupError::NoPrompts { .. }));
    }

    #[tokio::test]
    async fn output_dir_creation_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_output_dir(&nested).await.unwrap();
        ensure_output_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn output_path_that_is_a_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out");
        std::fs::write(&path, b"not a directory").unwrap();

        let err = ensure_output_dir(&path).await.unwrap_err();
        assert!(matches!(err, StartupError::OutputDir { .. }));
    }

    #[tokio::test]
    async fn save_png_writes_decodable_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("001_test.png");
        let image = DynamicImage::new_rgb8(4, 3);

        save_png(&image, &path).await.unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (4, 3));
    }

    #[tokio::test]
    async fn save_png_reports_write_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("001_test.png");

        let err = save_png(&DynamicImage::new_rgb8(1, 1), &path)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "write");
    }
}
