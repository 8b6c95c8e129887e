//! Rapport d'exécution avec graceful degradation
//!
//! Collecte les fichiers traités, les étiquettes placées et les erreurs
//! non-fatales pour un affichage en fin de run.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Statut global du run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Run terminé sans erreur
    Success,
    /// Run terminé avec des erreurs non-fatales
    PartialSuccess,
    /// Run échoué
    Failed,
}

/// Niveau de sévérité des erreurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorLevel {
    /// Erreur fatale: run abandonné
    Fatal,
    /// Erreur: fichier ou zone ignoré
    Error,
    /// Warning: sortie produite avec dégradation
    Warning,
}

/// Erreur de run avec contexte
#[derive(Debug, Clone, Serialize)]
pub struct RunError {
    pub level: ErrorLevel,
    /// Fichier source (optionnel)
    pub file: Option<String>,
    /// Zone ou région concernée (optionnel)
    pub area: Option<String>,
    pub message: String,
}

impl RunError {
    pub fn file(level: ErrorLevel, file: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            file: Some(file.to_string()),
            area: None,
            message: message.into(),
        }
    }

    pub fn area(level: ErrorLevel, area: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            file: None,
            area: Some(area.to_string()),
            message: message.into(),
        }
    }
}

/// Statistiques par format de sortie
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormatStats {
    pub files: usize,
    pub areas: usize,
}

/// Rapport complet d'un run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Commande exécutée (build, convert, ...)
    pub command: String,
    pub duration_secs: f64,
    pub status: RunStatus,

    pub files_processed: usize,
    pub files_failed: usize,
    pub areas_parsed: usize,
    pub labels_placed: usize,
    pub regions_written: usize,

    pub by_format: HashMap<String, FormatStats>,

    pub errors: Vec<RunError>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self {
            command: String::new(),
            duration_secs: 0.0,
            status: RunStatus::Success,
            files_processed: 0,
            files_failed: 0,
            areas_parsed: 0,
            labels_placed: 0,
            regions_written: 0,
            by_format: HashMap::new(),
            errors: Vec::new(),
        }
    }
}

impl RunReport {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            ..Default::default()
        }
    }

    /// Enregistre un fichier converti dans un format donné
    pub fn record_file(&mut self, format: &str, areas: usize) {
        self.files_processed += 1;
        self.areas_parsed += areas;
        let stats = self.by_format.entry(format.to_string()).or_default();
        stats.files += 1;
        stats.areas += areas;
    }

    /// Enregistre un fichier en échec
    pub fn record_file_failure(&mut self, file: &str, message: &str) {
        self.files_processed += 1;
        self.files_failed += 1;
        self.errors
            .push(RunError::file(ErrorLevel::Error, file, message));
    }

    pub fn record_labels(&mut self, count: usize) {
        self.labels_placed += count;
    }

    pub fn record_region(&mut self) {
        self.regions_written += 1;
    }

    pub fn record_error(&mut self, error: RunError) {
        self.errors.push(error);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final basé sur les erreurs
    pub fn finalize(&mut self) {
        let has_fatal = self.errors.iter().any(|e| e.level == ErrorLevel::Fatal);
        let has_errors = self.errors.iter().any(|e| e.level == ErrorLevel::Error);
        let has_success = self.files_processed > self.files_failed
            || self.labels_placed > 0
            || self.regions_written > 0;

        self.status = if has_fatal {
            RunStatus::Failed
        } else if has_errors && has_success {
            RunStatus::PartialSuccess
        } else if has_errors {
            RunStatus::Failed
        } else {
            RunStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("RUN REPORT - {}", self.command);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Files: {} processed, {} failed",
            self.files_processed, self.files_failed
        );
        println!(
            "Areas: {} parsed, {} labels placed, {} regions written",
            self.areas_parsed, self.labels_placed, self.regions_written
        );

        if !self.by_format.is_empty() {
            println!("\n--- BY FORMAT ---");
            let mut formats: Vec<_> = self.by_format.iter().collect();
            formats.sort_by_key(|(k, _)| k.as_str());
            for (format, stats) in formats {
                println!("  {}: {} files, {} areas", format, stats.files, stats.areas);
            }
        }

        let warnings: Vec<_> = self
            .errors
            .iter()
            .filter(|e| e.level == ErrorLevel::Warning)
            .collect();
        if !warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", warnings.len());
            for w in warnings.iter().take(10) {
                println!("  {} {}", location(w), w.message);
            }
            if warnings.len() > 10 {
                println!("  ... and {} more", warnings.len() - 10);
            }
        }

        let errors: Vec<_> = self
            .errors
            .iter()
            .filter(|e| e.level != ErrorLevel::Warning)
            .collect();
        if !errors.is_empty() {
            println!("\n--- ERRORS ({}) ---", errors.len());
            for e in errors.iter().take(20) {
                println!("  {:?} {} {}", e.level, location(e), e.message);
            }
            if errors.len() > 20 {
                println!("  ... and {} more", errors.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} files, {} areas, {} labels, {} regions, {} errors",
            self.command,
            self.files_processed,
            self.areas_parsed,
            self.labels_placed,
            self.regions_written,
            self.errors.len()
        )
    }
}

fn location(error: &RunError) -> String {
    match (&error.file, &error.area) {
        (Some(f), Some(a)) => format!("[{}:{}]", f, a),
        (Some(f), None) => format!("[{}]", f),
        (None, Some(a)) => format!("[{}]", a),
        _ => String::new(),
    }
}
