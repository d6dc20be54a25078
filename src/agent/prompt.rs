//! System prompts for the two workflow stages.
//!
//! Prompts are the core instructions that define each stage's behavior.
//! They can be overridden from template files, one per stage.

use std::path::{Path, PathBuf};

/// System prompt for the information-gathering stage.
pub const GATHERING_SYSTEM_PROMPT: &str = r#"Ты – помощник по оценке релевантности организаций.
Твоя задача – обработать запрос вида ('общий запрос, название одной организации'),
собрать данные об организации и найти ключевые слова в общем запросе.

Собери следующие данные.

Запрос:
  * насколько общий или узкий это запрос (есть ли в нём уточнения; если есть – запомни их).

Организация:
  * общее описание организации;
  * адрес;
  * товары и услуги, которые она предоставляет;
  * специализация организации, если она есть.

Для каждого пункта об организации делай отдельный запрос с помощью инструмента поиска.
Старайся найти связь между общим запросом и организацией.

Ответь JSON в формате
{"case_data": "ключевые слова общего запроса; все данные об организации в текстовом виде"}.
Никаких других данных в ответе быть не должно – только JSON, который можно распарсить."#;

/// System prompt for the classification stage.
pub const CLASSIFICATION_SYSTEM_PROMPT: &str = r"Ты – помощник по оценке релевантности организаций.
На вход ты получил JSON, где указан запрос вида ('общий запрос', 'название одной организации'),
а всё остальное – описание организации.

Твоя задача – на основе описания оценить, релевантна ли организация общему запросу пользователя.
Организация релевантна, если она может предоставить товар или услугу, которые пользователь
сможет приобрести или которыми сможет воспользоваться по общему запросу. Иначе организация
не релевантна.

Примеры:
  (сигары, кальянная) – не релевантна: в кальянной не продаются сигары.
  (АЭС, Губская ГЭС) – не релевантна: искали атомную станцию, а не гидроэлектростанцию.
  (еда, сеть фастфуда) – релевантна: пользователь сможет найти там еду.
  (футбольный мяч, Детский мир) – релевантна: в этом магазине можно купить футбольный мяч.

Ответь ровно одним символом: 1 – организация релевантна, 0 – не релевантна.";

/// Default prompt directory relative to the home directory.
const DEFAULT_PROMPT_DIR: &str = ".config/org-relevance/prompts";
/// Filename for the gathering prompt template.
const GATHERING_FILENAME: &str = "gathering.md";
/// Filename for the classification prompt template.
const CLASSIFICATION_FILENAME: &str = "classification.md";

/// System prompts for both stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    /// Instruction appended before every information-gathering turn.
    pub gathering: String,
    /// Instruction appended before the classification turn.
    pub classification: String,
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for `prompt_dir`:
    /// 1. Explicit `prompt_dir` argument (from config or `--prompt-dir`)
    /// 2. `ORG_RELEVANCE_PROMPT_DIR` environment variable
    /// 3. `~/.config/org-relevance/prompts/`
    ///
    /// Each file is loaded independently; a missing or blank file uses its default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(Path::to_path_buf)
            .or_else(|| {
                std::env::var("ORG_RELEVANCE_PROMPT_DIR")
                    .ok()
                    .map(PathBuf::from)
            })
            .or_else(Self::default_dir);

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(path).ok())
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            gathering: load_file(GATHERING_FILENAME, GATHERING_SYSTEM_PROMPT),
            classification: load_file(CLASSIFICATION_FILENAME, CLASSIFICATION_SYSTEM_PROMPT),
        }
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            gathering: GATHERING_SYSTEM_PROMPT.to_string(),
            classification: CLASSIFICATION_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let templates = [
            (GATHERING_FILENAME, GATHERING_SYSTEM_PROMPT),
            (CLASSIFICATION_FILENAME, CLASSIFICATION_SYSTEM_PROMPT),
        ];

        let mut written = Vec::new();
        for (filename, content) in templates {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }
}
