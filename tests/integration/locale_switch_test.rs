//! Integration tests for runtime locale switching under concurrency.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, Sender};
use veil_i18n::i18n::{
    CatalogSource, EmbeddedSource, LoadError, LocaleEntry, LocaleRegistry, SwitchState,
    TranslationService,
};

const CONSISTENT_PAIRS: [(&str, &str); 3] = [
    ("Connect", "Exit"),
    ("Подключиться", "Выход"),
    ("连接", "退出"),
];

/// Source that parks the Russian load until released.
struct GatedSource {
    started: Sender<()>,
    release: Receiver<()>,
}

impl CatalogSource for GatedSource {
    fn read(&self, entry: &LocaleEntry) -> Result<String, LoadError> {
        if entry.file_stem == "veil_ru" {
            let _ = self.started.send(());
            let _ = self.release.recv();
        }
        EmbeddedSource.read(entry)
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}

#[test]
fn test_readers_never_see_mixed_catalogs() {
    let service = Arc::new(TranslationService::with_defaults().unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let mut reads = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    let snapshot = service.snapshot();
                    let pair = (
                        snapshot.translate("MainWindow", "Connect", &[]),
                        snapshot.translate("SystemTray", "Exit", &[]),
                    );
                    assert!(
                        CONSISTENT_PAIRS
                            .iter()
                            .any(|(a, b)| pair.0 == *a && pair.1 == *b),
                        "mixed catalogs: {:?}",
                        pair
                    );

                    let single = service.translate("MainWindow", "Connect", &[]);
                    assert!(CONSISTENT_PAIRS.iter().any(|(a, _)| single == *a));
                    reads += 1;
                }
                reads
            })
        })
        .collect();

    for i in 0..300 {
        let code = ["ru_RU", "zh_CN", "en_US"][i % 3];
        service.set_locale(code).unwrap();
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(service.current_locale().code, "en_US");
}

#[test]
fn test_concurrent_switches_are_serialized() {
    let service = Arc::new(TranslationService::with_defaults().unwrap());
    let events = service.subscribe();

    let writers: Vec<_> = ["ru_RU", "zh_CN", "en_US", "ru_RU"]
        .into_iter()
        .map(|code| {
            let service = service.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    service.set_locale(code).unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    let received: Vec<_> = events.try_iter().collect();
    assert!(!received.is_empty());

    let mut current = "en_US".to_string();
    for event in &received {
        assert_eq!(event.previous.code, current, "notification out of order");
        assert_ne!(event.previous, event.current);
        current = event.current.code.clone();
    }
    assert_eq!(service.current_locale().code, current);
}

#[test]
fn test_translate_not_blocked_by_inflight_switch() {
    let (started_tx, started_rx) = bounded(1);
    let (release_tx, release_rx) = bounded(1);
    let source = GatedSource {
        started: started_tx,
        release: release_rx,
    };
    let service = Arc::new(
        TranslationService::new(LocaleRegistry::builtin(), source, "en_US", Some("en_US")).unwrap(),
    );

    let switcher = {
        let service = service.clone();
        thread::spawn(move || service.set_locale("ru_RU"))
    };

    started_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("switch should start loading");

    assert_eq!(service.controller().state(), SwitchState::Switching);
    assert_eq!(service.translate("MainWindow", "Connect", &[]), "Connect");
    assert_eq!(service.current_locale().code, "en_US");

    release_tx.send(()).unwrap();
    switcher.join().unwrap().unwrap();

    assert_eq!(service.controller().state(), SwitchState::Idle);
    assert_eq!(service.translate("MainWindow", "Connect", &[]), "Подключиться");
}

#[test]
fn test_observer_can_translate_new_locale() {
    let service = Arc::new(TranslationService::with_defaults().unwrap());
    let (tx, rx) = bounded(1);

    let observed = Arc::downgrade(&service);
    service.on_locale_changed(move |locale| {
        if let Some(service) = observed.upgrade() {
            let text = service.translate("SystemTray", "Exit", &[]);
            let _ = tx.send((locale.code.clone(), text));
        }
    });

    service.set_locale("zh_CN").unwrap();
    assert_eq!(
        rx.try_recv().unwrap(),
        ("zh_CN".to_string(), "退出".to_string())
    );
}
