use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::errors::{decode_record, AppError};
use crate::evaluation::coverage::{assemble_context, DEFAULT_CONTEXT_CHUNKS};
use crate::evaluation::{evaluate, score_retrieval_coverage};
use crate::layout::LayoutFormatter;
use crate::models::generation::GenerationOutput;
use crate::models::job::JobDescription;
use crate::models::resume::Resume;
use crate::models::retrieval::{RetrievalChunk, RetrievalContext};
use crate::models::style::StyleProfile;
use crate::pipeline::embedding::build_documents;
use crate::pipeline::{
    DirectoryDocumentSource, DocumentSource, InlineDocumentSource, ParseRequest, ParseStage,
    PiiRedactor,
};
use crate::validation::ResumeValidator;

/// `tailor` - parse, evaluate, validate and lay out tailored resumes.
#[derive(Parser, Debug)]
#[command(name = "tailor")]
#[command(version)]
#[command(about = "Parsing, scoring and validation core for tailored resumes.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a tailored resume against a job description
    Evaluate {
        /// Job description JSON record
        #[arg(long)]
        jd: PathBuf,

        /// Tailored resume JSON record
        #[arg(long)]
        resume: PathBuf,

        /// Retrieval context JSON (`{"chunks": [...]}`); no evidence when omitted
        #[arg(long)]
        retrieval: Option<PathBuf>,
    },

    /// Normalize the documents of a parse request
    Parse {
        /// Parse request JSON
        #[arg(long)]
        request: PathBuf,

        /// Resolve document keys as files under this directory
        #[arg(long)]
        documents_dir: Option<PathBuf>,
    },

    /// Parse a request, then print the evidence documents for the embedding step
    Documents {
        /// Parse request JSON
        #[arg(long)]
        request: PathBuf,

        /// Resolve document keys as files under this directory
        #[arg(long)]
        documents_dir: Option<PathBuf>,
    },

    /// Check generation output against the validation rules
    Validate {
        /// Generation output JSON (`tailoredResume`, `changeLog`, `coverLetter`)
        #[arg(long)]
        generation: PathBuf,

        /// Retrieval context JSON; its `coverage` is reported in the metrics
        #[arg(long)]
        retrieval: Option<PathBuf>,
    },

    /// Measure how much of the job the retrieved chunks mention
    Coverage {
        #[arg(long)]
        jd: PathBuf,

        #[arg(long)]
        retrieval: PathBuf,
    },

    /// Dedupe and rank raw search hits into a retrieval context
    Context {
        #[arg(long)]
        jd: PathBuf,

        /// JSON array of `{text, score, metadata}` hits
        #[arg(long)]
        hits: PathBuf,

        /// Number of chunks to keep
        #[arg(long, default_value_t = DEFAULT_CONTEXT_CHUNKS)]
        limit: usize,
    },

    /// Lay out a resume as plain text using a style profile
    Render {
        #[arg(long)]
        resume: PathBuf,

        /// Style profile JSON; default layout when omitted
        #[arg(long)]
        style: Option<PathBuf>,

        /// Change-log JSON array appended after the resume
        #[arg(long)]
        change_log: Option<PathBuf>,
    },
}

/// Runs a command and returns what should be printed to stdout.
pub async fn run(command: Commands, config: &Config) -> Result<String, AppError> {
    match command {
        Commands::Evaluate {
            jd,
            resume,
            retrieval,
        } => {
            let job: JobDescription = load_record("job description", &jd).await?;
            let resume: Resume = load_record("resume", &resume).await?;
            let retrieval = load_retrieval(retrieval.as_deref()).await?;
            to_pretty_json(&evaluate(&job, &resume, &retrieval))
        }

        Commands::Parse {
            request,
            documents_dir,
        } => {
            let request = ParseRequest::from_value(load_json(&request).await?)?;
            let stage = parse_stage(documents_dir, config);
            to_pretty_json(&stage.run(request).await?)
        }

        Commands::Documents {
            request,
            documents_dir,
        } => {
            let request = ParseRequest::from_value(load_json(&request).await?)?;
            let (tenant_id, job_id) = (request.tenant_id.clone(), request.job_id.clone());
            let parsed = parse_stage(documents_dir, config).run(request).await?;
            to_pretty_json(&build_documents(&tenant_id, &job_id, &parsed)?)
        }

        Commands::Validate {
            generation,
            retrieval,
        } => {
            let generation: GenerationOutput = load_record("generation output", &generation).await?;
            let retrieval = load_retrieval(retrieval.as_deref()).await?;
            let validator = ResumeValidator::new(config.banned_claims.clone());
            to_pretty_json(&validator.validate(&generation, &retrieval))
        }

        Commands::Coverage { jd, retrieval } => {
            let job: JobDescription = load_record("job description", &jd).await?;
            let retrieval: RetrievalContext = load_record("retrieval context", &retrieval).await?;
            to_pretty_json(&score_retrieval_coverage(&job, &retrieval.chunks))
        }

        Commands::Context { jd, hits, limit } => {
            let job: JobDescription = load_record("job description", &jd).await?;
            let hits: Vec<RetrievalChunk> = load_record("retrieval hits", &hits).await?;
            info!("Assembling context from {} hits (limit {})", hits.len(), limit);
            to_pretty_json(&assemble_context(&job, hits, limit))
        }

        Commands::Render {
            resume,
            style,
            change_log,
        } => {
            let resume: Resume = load_record("resume", &resume).await?;
            let profile: Option<StyleProfile> = match style {
                Some(path) => Some(load_record("style profile", &path).await?),
                None => None,
            };
            let change_log: Vec<Value> = match change_log {
                Some(path) => load_record("change log", &path).await?,
                None => Vec::new(),
            };
            Ok(LayoutFormatter::new(profile.as_ref()).render(&resume, &change_log))
        }
    }
}

fn parse_stage(documents_dir: Option<PathBuf>, config: &Config) -> ParseStage {
    let source: Arc<dyn DocumentSource> = match documents_dir {
        Some(dir) => {
            info!("Reading document keys from {}", dir.display());
            Arc::new(DirectoryDocumentSource::new(dir))
        }
        None => Arc::new(InlineDocumentSource),
    };
    ParseStage::new(source, PiiRedactor::default())
        .with_default_redaction(config.enable_pii_redaction)
}

async fn load_json(path: &Path) -> Result<Value, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

async fn load_record<T: DeserializeOwned>(kind: &str, path: &Path) -> Result<T, AppError> {
    decode_record(kind, load_json(path).await?)
}

async fn load_retrieval(path: Option<&Path>) -> Result<RetrievalContext, AppError> {
    match path {
        Some(path) => load_record("retrieval context", path).await,
        None => Ok(RetrievalContext::empty()),
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}
