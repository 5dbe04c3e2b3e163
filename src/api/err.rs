/// Application level errors
#[derive(thiserror::Error, Debug)]
pub enum CustomError {
    /// file could not be read or written
    #[error("gagal membaca/menulis file: {0}")]
    FileReadError(#[from] std::io::Error),
    /// csv processing failed
    #[error("gagal memproses csv: {0}")]
    CsvParseError(#[from] csv::Error),
    /// the csv parsed but its contents are not usable
    #[error("data csv tidak valid: {0}")]
    CsvDataError(String),
    /// regex related errors
    #[error("failed to parse or compile a regular expression: {0}")]
    RegexError(#[from] regex::Error),
    /// a value outside of a closed set (major, status)
    #[error("nilai {field} tidak dikenal: {value}")]
    UnknownEnumValue { field: &'static str, value: String },
    /// the student form failed validation
    #[error("data mahasiswa tidak valid: {0}")]
    InvalidStudent(String),
    /// no student carries the given id
    #[error("mahasiswa dengan id {0} tidak ditemukan")]
    StudentNotFound(String),
    /// wrong username or password; `hint` names the default account
    #[error("Username atau password salah{hint}")]
    InvalidCredentials { hint: &'static str },
    /// a data command was issued before logging in
    #[error("silakan masuk terlebih dahulu")]
    NotLoggedIn,
    /// environment configuration is malformed
    #[error("konfigurasi tidak valid: {0}")]
    Config(String),
    /// the logger could not be installed
    #[error("gagal menyiapkan logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Failures of the remote text-generation service.
#[derive(thiserror::Error, Debug)]
pub enum CollaboratorError {
    /// no api key was configured
    #[error("AI belum dikonfigurasi")]
    Unconfigured,
    #[error("permintaan http gagal: {0}")]
    Http(#[from] reqwest::Error),
    /// non-2xx answer from the service
    #[error("layanan AI mengembalikan status {status}: {message}")]
    Api { status: u16, message: String },
    /// the service answered without any text
    #[error("layanan AI tidak mengembalikan teks")]
    EmptyResponse,
    /// the answer text is not the JSON we asked for
    #[error("jawaban AI tidak dapat diurai: {0}")]
    Malformed(String),
}

/// The translator could not turn a query into a structured filter.
#[derive(thiserror::Error, Debug)]
#[error("tidak dapat menerjemahkan pencarian: {0}")]
pub struct TranslationFailure(#[from] pub CollaboratorError);
