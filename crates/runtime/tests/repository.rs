use game_core::{
    CharacterId, CharacterSheet, CombatReport, CombatSession, DropResult, Encounter, ItemDrop,
    ItemId, Phase, SessionId, StatSnapshot,
};
use runtime::{
    FileReportRepository, FileSessionRepository, ReportRepository, RepositoryError,
    SessionRepository,
};

fn report(session: u64, experience: u64) -> CombatReport {
    CombatReport {
        session: SessionId(session),
        encounter: "cellar".to_owned(),
        outcome: Phase::Victory,
        rounds: 4,
        experience_gained: experience,
        leveled_up: false,
        drops: DropResult {
            currency: 12,
            items: vec![ItemDrop {
                item: ItemId::new("bone_fragment"),
                quantity: 2,
            }],
        },
        snapshot: StatSnapshot {
            character: CharacterId::new("hero"),
            level: 1,
            experience,
            current_hp: 40,
            max_hp: 70,
        },
    }
}

#[test]
fn reports_are_stored_as_json_per_session() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileReportRepository::new(dir.path()).unwrap();

    repo.save_report(&report(1, 30)).unwrap();
    repo.save_report(&report(2, 50)).unwrap();
    repo.save_report(&report(1, 45)).unwrap();

    let first = repo.reports_for(SessionId(1)).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].report.experience_gained, 30);
    assert_eq!(first[1].report.experience_gained, 45);
    assert!(first[0].saved_at <= first[1].saved_at);
    assert_eq!(repo.all_reports().unwrap().len(), 3);

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn corrupted_report_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileReportRepository::new(dir.path()).unwrap();
    std::fs::write(dir.path().join("report_broken.json"), b"{ not json").unwrap();

    assert!(matches!(
        repo.all_reports(),
        Err(RepositoryError::CorruptedData(_))
    ));
}

#[test]
fn sessions_resume_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileSessionRepository::new(dir.path()).unwrap();
    let encounter = Encounter {
        id: "pit".to_owned(),
        name: "Pit".to_owned(),
        layout: vec!["P..".to_owned(), "..E".to_owned()],
        enemies: vec![],
    };
    let session = CombatSession::create(
        SessionId(0xbeef),
        CharacterSheet::new("hero", "Hero", 40, 6, 3),
        encounter,
        11,
    )
    .unwrap();

    assert!(repo.load(session.id).unwrap().is_none());
    repo.save(&session).unwrap();
    assert!(repo.exists(session.id));
    assert_eq!(repo.list().unwrap(), vec![SessionId(0xbeef)]);
    assert_eq!(repo.load(session.id).unwrap(), Some(session.clone()));

    repo.delete(session.id).unwrap();
    assert!(!repo.exists(session.id));
    assert!(repo.list().unwrap().is_empty());
}
