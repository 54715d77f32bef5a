use std::sync::Arc;

use chrono::NaiveDate;

use super::common::*;
use crate::accounts::{AccountRepository, InMemoryAccountRepository};
use crate::import::{CompanyImporter, ImportError, ImportLimits};

#[tokio::test]
async fn creates_companies_with_resolved_references() {
    let repository = repository();
    let importer = importer(repository.clone());

    let report = importer
        .import_text(&csv_with(&[
            data_line("Acme", "ana souza"),
            data_line("Globex", "BRUNO LIMA"),
        ]))
        .await
        .expect("import succeeds");

    assert_eq!(report.created, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.errors, 0);

    let owners = repository.owners().await.expect("owners");
    let teams = repository.teams().await.expect("teams");
    let acme = repository
        .find_company_by_name("acme")
        .await
        .expect("lookup")
        .expect("acme stored");
    assert_eq!(acme.owner_id, Some(owners[0].id));
    assert_eq!(acme.team_id, Some(teams[0].id));
    assert_eq!(acme.contract_start, NaiveDate::from_ymd_opt(2024, 3, 15));
    assert_eq!(acme.contract_end, NaiveDate::from_ymd_opt(2025, 3, 14));
    assert_eq!(acme.tags, vec!["vip"]);
}

#[tokio::test]
async fn second_run_skips_every_row() {
    let repository = repository();
    let importer = importer(repository.clone());
    let csv = csv_with(&[
        data_line("Acme", "Ana Souza"),
        data_line("Globex", "Bruno Lima"),
    ]);

    importer.import_text(&csv).await.expect("first run");
    let report = importer.import_text(&csv).await.expect("second run");

    assert_eq!(report.created, 0);
    assert_eq!(report.skipped, 2);
    assert!(report
        .skipped_details
        .iter()
        .all(|issue| issue.reason == "Empresa já existe"));
    assert_eq!(repository.company_count(), 2);
}

#[tokio::test]
async fn duplicate_names_within_one_file_create_once() {
    let repository = repository();
    let importer = importer(repository.clone());

    let report = importer
        .import_text(&csv_with(&[
            data_line("Acme", "Ana Souza"),
            data_line("ACME", "Bruno Lima"),
        ]))
        .await
        .expect("import succeeds");

    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.skipped_details[0].row, 3);
    assert_eq!(report.skipped_details[0].name, "ACME");
    assert_eq!(repository.company_count(), 1);
}

#[tokio::test]
async fn unknown_owner_is_an_error_and_nothing_is_stored() {
    let repository = repository();
    let importer = importer(repository.clone());

    let report = importer
        .import_text(&csv_with(&[data_line("Acme", "Carla Dias")]))
        .await
        .expect("import succeeds");

    assert_eq!(report.created, 0);
    assert_eq!(report.errors, 1);
    assert_eq!(report.error_details[0].row, 2);
    assert_eq!(report.error_details[0].name, "Acme");
    assert!(report.error_details[0].reason.contains("Carla Dias"));
    assert_eq!(repository.company_count(), 0);
}

#[tokio::test]
async fn blank_names_are_silently_ignored() {
    let repository = repository();
    let importer = importer(repository.clone());

    let report = importer
        .import_text(&csv_with(&[
            data_line("", "Ana Souza"),
            data_line("Acme", "Ana Souza"),
        ]))
        .await
        .expect("import succeeds");

    assert_eq!(report.created, 1);
    assert_eq!(report.processed(), 1);
}

#[tokio::test]
async fn blank_line_between_rows_is_not_a_row() {
    let repository = repository();
    let importer = importer(repository.clone());
    let csv = format!(
        "{}\n{}\n\n{}\n",
        header_line(),
        data_line("Acme", "Ana Souza"),
        data_line("Globex", "Ana Souza")
    );

    let report = importer.import_text(&csv).await.expect("import succeeds");
    assert_eq!(report.created, 2);
    assert_eq!(report.error_details.len(), 0);
}

#[tokio::test]
async fn missing_column_rejects_the_whole_file() {
    let repository = repository();
    let importer = importer(repository.clone());
    let header = header_line().replace(",Framework", "");
    let csv = format!("{header}\nAcme,Ana Souza\n");

    let error = importer.import_text(&csv).await.expect_err("rejected");
    match error {
        ImportError::MissingColumns(missing) => {
            assert_eq!(missing, vec!["Framework".to_string()])
        }
        other => panic!("expected missing columns, got {other:?}"),
    }
    assert_eq!(repository.company_count(), 0);
}

#[tokio::test]
async fn header_only_file_is_rejected() {
    let importer = importer(repository());
    let error = importer
        .import_text(&format!("{}\n", header_line()))
        .await
        .expect_err("rejected");
    assert!(matches!(error, ImportError::NoDataRows));

    let error = importer.import_text("").await.expect_err("rejected");
    assert!(matches!(error, ImportError::NoDataRows));
}

#[tokio::test]
async fn row_ceiling_is_checked_before_processing() {
    let repository = repository();
    let importer = importer(repository.clone());
    let lines: Vec<String> = (0..2001)
        .map(|index| data_line(&format!("Empresa {index}"), "Ana Souza"))
        .collect();

    let error = importer
        .import_text(&csv_with(&lines))
        .await
        .expect_err("rejected");
    assert!(matches!(error, ImportError::TooManyRows { limit: 2000 }));
    assert_eq!(repository.company_count(), 0);
}

#[tokio::test]
async fn exactly_the_row_ceiling_is_accepted() {
    let repository = Arc::new(InMemoryAccountRepository::with_seed(
        ["Ana Souza"],
        ["Squad Alpha"],
    ));
    let importer = CompanyImporter::new(
        repository.clone(),
        ImportLimits {
            max_bytes: 1024 * 1024,
            max_rows: 3,
        },
    );
    let lines: Vec<String> = (0..3)
        .map(|index| data_line(&format!("Empresa {index}"), "Ana Souza"))
        .collect();

    let report = importer
        .import_text(&csv_with(&lines))
        .await
        .expect("import succeeds");
    assert_eq!(report.created, 3);
}

#[tokio::test]
async fn byte_ceiling_is_checked_before_parsing() {
    let repository = repository();
    let importer = importer(repository.clone());
    let mut upload = csv_with(&[data_line("Acme", "Ana Souza")]).into_bytes();
    upload.resize(1024 * 1024 + 1, b' ');

    let error = importer.import_bytes(&upload).await.expect_err("rejected");
    assert!(matches!(
        error,
        ImportError::FileTooLarge {
            limit_bytes: 1_048_576
        }
    ));
    assert_eq!(error.to_string(), "Arquivo excede o limite de 1 MB");
    assert_eq!(repository.company_count(), 0);
}

#[tokio::test]
async fn unparseable_dates_are_left_unset() {
    let repository = repository();
    let importer = importer(repository.clone());
    let line = "Acme,Ana Souza,,not-a-date,,,,,,".to_string();

    let report = importer
        .import_text(&csv_with(&[line]))
        .await
        .expect("import succeeds");
    assert_eq!(report.created, 1);

    let acme = repository
        .find_company_by_name("Acme")
        .await
        .expect("lookup")
        .expect("stored");
    assert!(acme.contract_start.is_none());
    assert!(acme.team_id.is_none());
    assert_eq!(acme.status, "Ativo");
}

#[tokio::test]
async fn quoted_names_keep_commas_and_quotes() {
    let repository = repository();
    let importer = importer(repository.clone());
    let line = "\"Acme, Inc.\"\"ltd\"\"\",Ana Souza,,,,,,,,".to_string();

    importer
        .import_text(&csv_with(&[line]))
        .await
        .expect("import succeeds");

    assert!(repository
        .find_company_by_name("Acme, Inc.\"ltd\"")
        .await
        .expect("lookup")
        .is_some());
}

#[tokio::test]
async fn persistence_failures_are_collected_per_row() {
    let repository = Arc::new(ReadOnlyRepository {
        inner: InMemoryAccountRepository::with_seed(["Ana Souza"], Vec::<String>::new()),
    });
    let importer = importer(repository);

    let report = importer
        .import_text(&csv_with(&[
            data_line("Acme", "Ana Souza"),
            data_line("Globex", "Ana Souza"),
        ]))
        .await
        .expect("import still reports");

    assert_eq!(report.created, 0);
    assert_eq!(report.errors, 2);
    assert!(report.error_details[1].reason.contains("database offline"));
}

#[tokio::test]
async fn uniqueness_conflict_on_insert_counts_as_skipped() {
    let inner = InMemoryAccountRepository::with_seed(["Ana Souza"], Vec::<String>::new());
    let repository = Arc::new(RacingRepository {
        inner: inner.clone(),
    });
    let importer = importer(repository);

    let report = importer
        .import_text(&csv_with(&[
            data_line("Acme", "Ana Souza"),
            data_line("acme", "Ana Souza"),
        ]))
        .await
        .expect("import succeeds");

    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors, 0);
    assert_eq!(inner.company_count(), 1);
}

#[tokio::test]
async fn lookup_failure_aborts_with_repository_error() {
    let importer = importer(Arc::new(UnavailableRepository));
    let error = importer
        .import_text(&csv_with(&[data_line("Acme", "Ana Souza")]))
        .await
        .expect_err("lookups unavailable");
    assert!(matches!(error, ImportError::Repository(_)));
}

#[tokio::test]
async fn separator_only_line_keeps_its_row_number() {
    let repository = repository();
    let importer = importer(repository.clone());

    let report = importer
        .import_text(&csv_with(&[
            data_line("Acme", "Ana Souza"),
            ",,,,,,,,,".to_string(),
            data_line("Globex", "Carla Dias"),
        ]))
        .await
        .expect("import succeeds");

    assert_eq!(report.created, 1);
    assert_eq!(report.processed(), 2);
    assert_eq!(report.error_details[0].row, 4);
    assert_eq!(report.error_details[0].name, "Globex");
}
