//! Recording fakes for the service traits.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use art_core::Creativity;
use art_llm::{AnalysisService, GenerationService, RefinementService, ServiceError, Services};
use async_trait::async_trait;

pub const DEFAULT_REFINED: &str = "A refined concept";

#[derive(Default)]
pub struct FakeRefinement {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub calls: Mutex<Vec<(String, Creativity)>>,
}

impl FakeRefinement {
    pub fn with_replies(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        let fake = Self::default();
        *fake.replies.lock().unwrap() = replies
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        Arc::new(fake)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompt(&self, n: usize) -> String {
        self.calls.lock().unwrap()[n].0.clone()
    }

    pub fn creativity(&self, n: usize) -> Creativity {
        self.calls.lock().unwrap()[n].1
    }
}

#[async_trait]
impl RefinementService for FakeRefinement {
    async fn refine(&self, prompt: &str, creativity: Creativity) -> art_llm::Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), creativity));
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(reason)) => Err(ServiceError::Api(reason)),
            None => Ok(DEFAULT_REFINED.to_string()),
        }
    }
}

#[derive(Default)]
pub struct FakeGeneration {
    pub fail: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGeneration {
    pub fn working() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationService for FakeGeneration {
    async fn render(&self, concept: &str) -> art_llm::Result<String> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(concept.to_string());
        if self.fail {
            return Err(ServiceError::Prediction("generation unavailable".to_string()));
        }
        Ok(format!("/tmp/generated_{}.png", calls.len()))
    }
}

#[derive(Default)]
pub struct FakeAnalysis {
    pub fail: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeAnalysis {
    pub fn working() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalysisService for FakeAnalysis {
    async fn analyze(&self, image_reference: &str) -> art_llm::Result<String> {
        self.calls.lock().unwrap().push(image_reference.to_string());
        if self.fail {
            return Err(ServiceError::Api("vision model offline".to_string()));
        }
        Ok(format!("Analysis of {image_reference}"))
    }
}

pub fn services(
    refinement: &Arc<FakeRefinement>,
    generation: &Arc<FakeGeneration>,
    analysis: Option<&Arc<FakeAnalysis>>,
) -> Services {
    Services {
        refinement: refinement.clone(),
        generation: generation.clone(),
        analysis: analysis.map(|a| a.clone() as Arc<dyn AnalysisService>),
    }
}
