use crate::{
    api::{
        ProblemList, QueryBody, QuestionData, SubmissionDetailData, SubmissionEntry,
        SubmissionListData,
    },
    book::{Book, BookSelector},
    config::GraspConfig,
    error::{Error, Result},
    lang::Language,
    problem::{BookGraspContext, ProblemSummary},
    render::{href, Difficulty, IndexEntry, IndexPage, StatementPage},
    session::Session,
    store::{escape_title, folder_name, solution_file, Store, STATEMENT_EXT},
    transport::Transport,
};
use std::{collections::HashMap, path::PathBuf, str::FromStr};
use tracing::{debug, error, info, warn};

/// Side channel for per-problem progress.
pub trait Progress {
    fn begin(&mut self, _book: Book, _total: usize) {}
    fn step(&mut self, _current: usize, _total: usize, _problem: &ProblemSummary) {}
    fn end(&mut self, _book: Book) {}
}

/// Reports progress as log lines.
#[derive(Debug, Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn begin(&mut self, book: Book, total: usize) {
        info!("start grasping BOOK [{book}], {total} problems");
    }

    fn step(&mut self, current: usize, total: usize, problem: &ProblemSummary) {
        info!(
            "processing problem [{} - {}] ({current}/{total})",
            problem.qid, problem.title
        );
    }

    fn end(&mut self, book: Book) {
        info!("grasp BOOK [{book}] finished");
    }
}

#[derive(Debug, Default)]
pub struct Silent;

impl Progress for Silent {}

/// What happened to one book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookReport {
    pub book: Option<Book>,
    pub listed: usize,
    /// Fetched over the network in this run.
    pub grasped: usize,
    /// Skipped because a folder already existed.
    pub resumed: usize,
    pub failed: usize,
    pub index: Option<PathBuf>,
}

/// The user's latest accepted submission of one problem.
#[derive(Debug, Clone)]
pub struct AcceptedSubmission {
    pub lang: Language,
    pub code: String,
}

/// Problem statement as the remote describes it.
#[derive(Debug, Clone)]
pub struct Statement {
    pub title: String,
    pub difficulty: Difficulty,
    pub content: String,
}

pub struct Grasper<'a, T, P> {
    session: &'a Session<T>,
    config: GraspConfig,
    store: Store,
    progress: P,
}

impl<'a, T: Transport, P: Progress> Grasper<'a, T, P> {
    pub fn new(session: &'a Session<T>, config: GraspConfig, progress: P) -> Self {
        let store = Store::new(config.save_root.clone());
        Self {
            session,
            config,
            store,
            progress,
        }
    }

    /// Grasps one book, or every book in order for `"all"`.
    ///
    /// Fails before touching the network when the session is not signed in
    /// or the key names no book. Per-problem failures are logged and counted
    /// in the returned reports instead.
    pub async fn grasp_book(&mut self, key: &str) -> Result<Vec<BookReport>> {
        if !self.session.is_signed_in() {
            warn!("not signed in yet, please login first");
            return Err(Error::NotSignedIn);
        }
        let selector = BookSelector::from_str(key).map_err(|e| {
            warn!("grasp failed, book {key} not found");
            e
        })?;
        if selector == BookSelector::All {
            info!("all books will be grasped");
        }

        let mut reports = vec![];
        for book in selector.books() {
            match self.grasp_one(book).await {
                Ok(report) => reports.push(report),
                Err(e) => error!("grasp BOOK [{book}] failed: {e}"),
            }
        }
        Ok(reports)
    }

    async fn grasp_one(&mut self, book: Book) -> Result<BookReport> {
        let mut ctx = self.list_accepted(book).await?;
        let total = ctx.problems.len();
        let mut report = BookReport {
            book: Some(book),
            listed: total,
            ..Default::default()
        };
        info!("get BOOK [{book}] list successfully, collect {total} problems");
        if total == 0 {
            info!("no accepted submissions in BOOK [{book}]");
            return Ok(report);
        }

        let mut saved = if self.config.force {
            HashMap::new()
        } else {
            self.store.grasped_titles(book)?
        };

        self.progress.begin(book, total);
        for (idx, problem) in ctx.problems.iter_mut().enumerate() {
            self.progress.step(idx + 1, total, problem);

            if !self.config.force {
                if let Some(title) = saved.remove(&problem.qid) {
                    debug!("problem [{}] has been grasped, skip it", problem.title);
                    problem.mark_grasped(title);
                    report.resumed += 1;
                    continue;
                }
            }

            match self.grasp_problem(book, problem).await {
                Ok(()) => report.grasped += 1,
                Err(e) => {
                    warn!("problem [{}] grasp failed, skip it: {e}", problem.title);
                    report.failed += 1;
                }
            }
        }
        self.progress.end(book);

        match self.write_index(&ctx) {
            Ok(path) => report.index = Some(path),
            Err(e) => error!("failed to write index of BOOK [{book}]: {e}"),
        }
        Ok(report)
    }

    async fn list_accepted(&self, book: Book) -> Result<BookGraspContext> {
        let url = self.session.endpoints().problem_list(book);
        let list: ProblemList = self.session.get(&url).await?;
        Ok(BookGraspContext::from_listing(book, list))
    }

    async fn grasp_problem(&self, book: Book, problem: &mut ProblemSummary) -> Result<()> {
        let submission = self.fetch_latest_accepted_submission(problem).await?;
        let statement = self.fetch_problem_statement(problem).await?;

        let page = StatementPage::new(
            &problem.qid,
            &statement.title,
            statement.difficulty,
            &statement.content,
        )
        .generate()?;
        self.store.save_problem(
            book,
            &problem.qid,
            &statement.title,
            &page,
            &submission.code,
            submission.lang,
        )?;
        problem.mark_grasped(statement.title);
        Ok(())
    }

    /// Finds the newest accepted submission and fetches its code.
    ///
    /// The list comes back newest first. The detail call sometimes answers
    /// with an empty payload; that alone is retried, up to
    /// `submission_attempts` times. Transport errors end the problem at once.
    pub async fn fetch_latest_accepted_submission(
        &self,
        problem: &ProblemSummary,
    ) -> Result<AcceptedSubmission> {
        let endpoints = self.session.endpoints();
        let list: Option<SubmissionListData> = self
            .session
            .query(
                &endpoints.submissions(&problem.slug),
                &QueryBody::submissions(&problem.slug, self.config.page_size, self.config.verbose),
            )
            .await?;

        let entry: SubmissionEntry = list
            .and_then(|d| d.submission_list)
            .and_then(|l| {
                l.submissions
                    .into_iter()
                    .find(|s| s.status_display.as_deref() == Some("Accepted"))
            })
            .ok_or_else(|| {
                info!("no accepted solution found for [{}]", problem.title);
                Error::NoAcceptedSubmission(problem.slug.clone())
            })?;
        let lang = Language::from_tag(entry.lang.as_deref().unwrap_or_default())?;

        let referer = endpoints.site(entry.url.as_deref().unwrap_or_default());
        let body = QueryBody::submission_detail(&entry.id, self.config.verbose);
        let attempts = self.config.submission_attempts;
        for attempt in 1..=attempts {
            let detail = self
                .session
                .query::<SubmissionDetailData>(&referer, &body)
                .await?
                .and_then(|d| d.submission_detail)
                .and_then(|d| d.code);
            if let Some(code) = detail {
                debug!("get problem [{}] latest accepted submission", problem.title);
                return Ok(AcceptedSubmission { lang, code });
            }

            if attempt == 2 {
                info!("get submission error, retrying");
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.submission_interval).await;
            }
        }

        Err(Error::SubmissionUnavailable {
            slug: problem.slug.clone(),
            attempts,
        })
    }

    /// Fetches title, difficulty and body of a problem. Not retried.
    pub async fn fetch_problem_statement(&self, problem: &ProblemSummary) -> Result<Statement> {
        let data: Option<QuestionData> = self
            .session
            .query(
                &self.session.endpoints().problem(&problem.slug),
                &QueryBody::question(&problem.slug, self.config.verbose),
            )
            .await?;
        let question = data
            .and_then(|d| d.question)
            .ok_or_else(|| Error::QuestionUnavailable(problem.slug.clone()))?;

        let title = question
            .translated_title
            .filter(|t| !t.is_empty())
            .or(question.title)
            .unwrap_or_else(|| problem.title.clone());
        let content = question
            .translated_content
            .filter(|c| !c.is_empty())
            .or(question.content)
            .unwrap_or_default();
        debug!("get problem [{}] description", problem.title);

        Ok(Statement {
            title,
            difficulty: Difficulty::parse(question.difficulty.as_deref()),
            content,
        })
    }

    /// Writes the book index for every grasped problem of the book.
    fn write_index(&self, ctx: &BookGraspContext) -> Result<PathBuf> {
        let entries = ctx
            .grasped()
            .into_iter()
            .map(|p| self.index_entry(ctx.book, p))
            .collect::<Result<Vec<_>>>()?;
        let html = IndexPage {
            book: ctx.book,
            entries,
        }
        .generate()?;
        self.store.write_index(ctx.book, &html)
    }

    fn index_entry(&self, book: Book, problem: &ProblemSummary) -> Result<IndexEntry> {
        let title = problem.translated_title.as_deref().unwrap_or(&problem.title);
        let folder = folder_name(&problem.qid, title);
        let dir = self.store.problem_dir(book, &problem.qid, title);
        let solution = solution_file(&dir)?;
        let solution_name = solution
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let statement_name = format!("{}.{STATEMENT_EXT}", escape_title(title));

        Ok(IndexEntry {
            qid: problem.qid.clone(),
            title: title.to_string(),
            statement_href: href([folder.as_str(), statement_name.as_str()]),
            solution_href: href([folder.as_str(), solution_name]),
        })
    }
}
