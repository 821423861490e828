//! 방 수명 주기 레지스트리
//!
//! 방 코드 -> 멤버 집합 매핑과 connection_id -> 방 코드 역방향 인덱스를 함께 관리한다.
//! 방 단위 변경(추가/삭제/비었는지 확인/방 삭제)은 해당 방의 DashMap 샤드 락 안에서
//! 한 번에 처리되며, 락 순서는 항상 `rooms` -> `memberships` 이다.

use crate::error::RoomError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

type CodeGenerator = Box<dyn Fn() -> String + Send + Sync>;

/// 방 정보
struct Room {
    members: HashSet<String>,
    created_at: Instant,
}

impl Room {
    fn new() -> Self {
        Self {
            members: HashSet::new(),
            created_at: Instant::now(),
        }
    }
}

/// 멤버 추가 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyMember,
}

/// 멤버 제거 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Removal {
    /// 실제로 멤버였던 경우 true
    pub removed: bool,
    /// 이 호출이 마지막 멤버를 제거해서 방이 삭제된 경우 true
    pub room_deconstructed: bool,
}

/// 프로세스 전체에서 하나만 사용하는 방 레지스트리
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
    /// 역방향 인덱스 (connection_id -> room_code)
    memberships: DashMap<String, String>,
    /// 생성 중인 방까지 포함한 개수. 항상 max_rooms 이하
    reserved: AtomicUsize,
    max_rooms: usize,
    generate_code: CodeGenerator,
}

impl RoomRegistry {
    pub fn new(max_rooms: usize) -> Self {
        Self::with_code_generator(max_rooms, random_room_code)
    }

    /// 방 코드 생성기를 지정해서 생성
    pub fn with_code_generator<F>(max_rooms: usize, generate_code: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            rooms: DashMap::new(),
            memberships: DashMap::new(),
            reserved: AtomicUsize::new(0),
            max_rooms,
            generate_code: Box::new(generate_code),
        }
    }

    pub fn max_rooms(&self) -> usize {
        self.max_rooms
    }

    /// 새 방 생성. 용량이 가득 차면 상태를 바꾸지 않고 `CapacityExceeded`
    pub fn create_room(&self) -> Result<String, RoomError> {
        let max_rooms = self.max_rooms;
        let reserved = self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max_rooms).then_some(n + 1)
            });
        if reserved.is_err() {
            tracing::warn!(max_rooms = max_rooms, "Room capacity reached, rejected create");
            return Err(RoomError::CapacityExceeded);
        }

        // 코드 충돌 시 재시도
        loop {
            let code = (self.generate_code)();
            match self.rooms.entry(code) {
                Entry::Vacant(slot) => {
                    let code = slot.key().clone();
                    slot.insert(Room::new());
                    tracing::info!(room_code = %code, "Room created");
                    return Ok(code);
                }
                Entry::Occupied(existing) => {
                    tracing::debug!(room_code = %existing.key(), "Room code collision, retrying");
                }
            }
        }
    }

    pub fn room_exists(&self, room_code: &str) -> bool {
        self.rooms.contains_key(room_code)
    }

    /// 방에 멤버 추가. 이미 같은 방 멤버면 no-op
    pub fn add_member(&self, room_code: &str, connection_id: &str) -> Result<AddOutcome, RoomError> {
        let mut room = self.rooms.get_mut(room_code).ok_or(RoomError::RoomNotFound)?;

        match self.memberships.entry(connection_id.to_string()) {
            Entry::Occupied(current) if current.get() == room_code => Ok(AddOutcome::AlreadyMember),
            Entry::Occupied(current) => Err(RoomError::AlreadyJoined {
                room_code: current.get().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(room_code.to_string());
                room.members.insert(connection_id.to_string());
                Ok(AddOutcome::Added)
            }
        }
    }

    /// 방에서 멤버 제거. 방이 비면 같은 락 안에서 방도 삭제
    pub fn remove_member(&self, room_code: &str, connection_id: &str) -> Removal {
        let mut removed = false;
        let room_deconstructed = self
            .rooms
            .remove_if_mut(room_code, |_, room| {
                removed = room.members.remove(connection_id);
                if removed {
                    self.memberships
                        .remove_if(connection_id, |_, code| code == room_code);
                }
                removed && room.members.is_empty()
            })
            .is_some();

        if room_deconstructed {
            self.reserved.fetch_sub(1, Ordering::AcqRel);
            tracing::info!(room_code = %room_code, "Room deconstructed");
        }

        Removal {
            removed,
            room_deconstructed,
        }
    }

    /// 멤버 목록 스냅샷 (복사본)
    pub fn get_members(&self, room_code: &str) -> HashSet<String> {
        self.rooms
            .get(room_code)
            .map(|room| room.members.clone())
            .unwrap_or_default()
    }

    pub fn find_room_of(&self, connection_id: &str) -> Option<String> {
        self.memberships
            .get(connection_id)
            .map(|code| code.value().clone())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// 생성 후 아무도 입장하지 않은 채 `max_idle` 이상 지난 방 정리
    pub fn reap_idle_rooms(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut reaped = 0;

        self.rooms.retain(|room_code, room| {
            let idle = room.members.is_empty() && now.duration_since(room.created_at) >= max_idle;
            if idle {
                tracing::info!(room_code = %room_code, "Reaped unjoined room");
                reaped += 1;
            }
            !idle
        });

        if reaped > 0 {
            self.reserved.fetch_sub(reaped, Ordering::AcqRel);
        }
        reaped
    }
}

/// 8자리 소문자 16진수 방 코드
pub fn random_room_code() -> String {
    format!("{:08x}", rand::random::<u32>())
}
