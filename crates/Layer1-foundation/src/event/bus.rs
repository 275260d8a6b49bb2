//! Event Bus - 이벤트 발행/구독
//!
//! 호스트 시그널(`CurrentChanged`, `LayoutModified`)과 레지스트리/라우터의
//! 진행 상황이 모두 이 버스를 통해 전달된다.

use super::types::{EventType, LabEvent};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::trace;

// ============================================================================
// EventHandler - 이벤트 핸들러 트레이트
// ============================================================================

/// 이벤트 핸들러 트레이트
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// 핸들러 이름 (같은 이름으로 다시 등록하면 교체됨)
    fn name(&self) -> &str;

    /// 관심 있는 이벤트 타입들
    fn interested_events(&self) -> Vec<EventType>;

    /// 이벤트 처리
    async fn handle(&self, event: &LabEvent);
}

// ============================================================================
// EventBus
// ============================================================================

/// 이벤트 버스 - 이벤트 발행 및 구독 관리
pub struct EventBus {
    /// 브로드캐스트 채널 발신자
    sender: broadcast::Sender<LabEvent>,

    /// 등록된 핸들러
    handlers: RwLock<HashMap<String, Arc<dyn EventHandler>>>,

    /// 이벤트 히스토리 (최근 N개)
    history: RwLock<VecDeque<LabEvent>>,

    /// 히스토리 최대 크기
    history_size: usize,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_capacity(256, 100)
    }

    /// 용량 지정하여 생성
    pub fn with_capacity(channel_capacity: usize, history_size: usize) -> Self {
        let (sender, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            sender,
            handlers: RwLock::new(HashMap::new()),
            history: RwLock::new(VecDeque::with_capacity(history_size)),
            history_size,
        }
    }

    /// 이벤트 핸들러 등록
    pub async fn register_handler(&self, handler: Arc<dyn EventHandler>) {
        let name = handler.name().to_string();
        self.handlers.write().await.insert(name, handler);
    }

    /// 이벤트 핸들러 제거
    pub async fn unregister_handler(&self, name: &str) -> bool {
        self.handlers.write().await.remove(name).is_some()
    }

    /// 이벤트 발행
    ///
    /// 관심 있는 핸들러가 모두 끝난 뒤에 반환된다.
    pub async fn publish(&self, event: LabEvent) {
        trace!("Publishing event: {} from {}", event.event_type, event.source);

        if self.history_size > 0 {
            let mut history = self.history.write().await;
            if history.len() >= self.history_size {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        // 구독자가 없어도 OK
        let _ = self.sender.send(event.clone());

        let handlers: Vec<Arc<dyn EventHandler>> = {
            let handlers = self.handlers.read().await;
            handlers
                .values()
                .filter(|h| h.interested_events().contains(&event.event_type))
                .cloned()
                .collect()
        };
        for handler in handlers {
            handler.handle(&event).await;
        }
    }

    /// 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<LabEvent> {
        self.sender.subscribe()
    }

    /// 이벤트 히스토리 조회
    pub async fn history(&self) -> Vec<LabEvent> {
        self.history.read().await.iter().cloned().collect()
    }

    /// 특정 타입의 이벤트 히스토리 조회
    pub async fn history_by_type(&self, event_type: EventType) -> Vec<LabEvent> {
        self.history
            .read()
            .await
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// 등록된 핸들러 수
    pub async fn handler_count(&self) -> usize {
        self.handlers.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        hits: AtomicUsize,
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        fn name(&self) -> &str {
            "counter"
        }

        fn interested_events(&self) -> Vec<EventType> {
            vec![EventType::LayoutModified]
        }

        async fn handle(&self, _event: &LabEvent) {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_handler_filtering() {
        let bus = EventBus::new();
        let handler = Arc::new(CountingHandler {
            hits: AtomicUsize::new(0),
        });
        bus.register_handler(handler.clone()).await;

        bus.publish(LabEvent::simple(EventType::LayoutModified, "shell"))
            .await;
        bus.publish(LabEvent::simple(EventType::CurrentChanged, "shell"))
            .await;

        assert_eq!(handler.hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.history().await.len(), 2);
        assert_eq!(
            bus.history_by_type(EventType::CurrentChanged).await.len(),
            1
        );
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let bus = EventBus::with_capacity(8, 2);
        for _ in 0..5 {
            bus.publish(LabEvent::simple(EventType::Custom, "test")).await;
        }
        assert_eq!(bus.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_subscribe() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();

        bus.publish(LabEvent::simple(EventType::ApplicationRestored, "app"))
            .await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::ApplicationRestored);
    }

    #[tokio::test]
    async fn test_unregister_handler() {
        let bus = EventBus::new();
        bus.register_handler(Arc::new(CountingHandler {
            hits: AtomicUsize::new(0),
        }))
        .await;

        assert!(bus.unregister_handler("counter").await);
        assert_eq!(bus.handler_count().await, 0);
    }
}
