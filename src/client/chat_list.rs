//! Chat List
//!
//! Ordered, id-unique collections owned by a parent view, and the chat context the
//! search modal writes into when a chat is opened.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::shared::messaging::{Chat, ChatId, RelationshipRequest, RequestId, User, UserId};

/// Entities that carry a stable identifier
pub trait Identified {
    type Id: PartialEq + Clone;

    fn id(&self) -> &Self::Id;
}

impl Identified for Chat {
    type Id = ChatId;

    fn id(&self) -> &ChatId {
        &self.id
    }
}

impl Identified for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

impl Identified for RelationshipRequest {
    type Id = RequestId;

    fn id(&self) -> &RequestId {
        &self.id
    }
}

/// What [`EntityList::prepend`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced { index: usize },
}

/// Ordered sequence with at most one entity per id
#[derive(Debug, Clone, PartialEq)]
pub struct EntityList<T> {
    items: Vec<T>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `items`, keeping the first occurrence of each id
    pub fn from_vec(items: Vec<T>) -> Self {
        let mut list = Self::new();
        for item in items {
            if list.position(item.id()).is_none() {
                list.items.push(item);
            }
        }
        list
    }

    /// Replace the entity with the same id in place, or insert at the front
    pub fn prepend(&mut self, entity: T) -> Upsert {
        match self.position(entity.id()) {
            Some(index) => {
                self.items[index] = entity;
                Upsert::Replaced { index }
            }
            None => {
                self.items.insert(0, entity);
                Upsert::Inserted
            }
        }
    }

    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

#[derive(Debug, Default)]
struct ChatContextInner {
    chats: EntityList<Chat>,
    selected: Option<Chat>,
}

/// The user's chats plus the one currently open. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    inner: Arc<Mutex<ChatContextInner>>,
}

impl ChatContext {
    pub fn new(chats: Vec<Chat>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ChatContextInner {
                chats: EntityList::from_vec(chats),
                selected: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChatContextInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `chat` the active chat and put it in the list
    pub fn open_chat(&self, chat: Chat) -> Upsert {
        let mut inner = self.lock();
        inner.selected = Some(chat.clone());
        let outcome = inner.chats.prepend(chat);
        tracing::debug!(?outcome, chats = inner.chats.len(), "chat opened");
        outcome
    }

    pub fn selected(&self) -> Option<Chat> {
        self.lock().selected.clone()
    }

    pub fn clear_selection(&self) {
        self.lock().selected = None;
    }

    pub fn chats(&self) -> Vec<Chat> {
        self.lock().chats.as_slice().to_vec()
    }

    pub fn replace_chats(&self, chats: Vec<Chat>) {
        self.lock().chats = EntityList::from_vec(chats);
    }
}
