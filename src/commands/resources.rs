use crate::api::*;
use crate::commands::Command;
use crate::output::print_envelope;

/// Issue the single remote call behind a resource command and print it.
pub async fn run<A: ScanerrApi + ?Sized>(api: &A, command: Command, verbose: bool) -> anyhow::Result<bool> {
    let envelope = match command {
        Command::AddSite { site_url, page_urls } => {
            let request = AddSiteRequest {
                site_url,
                page_urls: (!page_urls.is_empty()).then_some(page_urls),
            };
            api.add_site(&request).await?
        }
        Command::GetSites { site_id } => api.get_sites(&GetSitesRequest { site_id }).await?,
        Command::CrawlSite { site_id } => api.crawl_site(&site_id).await?,
        Command::DeleteSite { site_id } => api.delete_site(&site_id).await?,
        Command::AddPage { site_id, page_url } => {
            let request = AddPageRequest {
                site_id,
                page_url: Some(page_url),
                page_urls: None,
            };
            api.add_page(&request).await?
        }
        Command::GetPages { site_id, page_id } => {
            let request = GetPagesRequest {
                site_id,
                page_id,
                lean: true,
            };
            api.get_pages(&request).await?
        }
        Command::DeletePage { page_id } => api.delete_page(&page_id).await?,
        Command::ScanSite { site_id } => api.scan(&ScanRequest::site(site_id)).await?,
        Command::ScanPage { page_id } => api.scan(&ScanRequest::page(page_id)).await?,
        Command::GetScans { scan_id, page_id } => {
            let request = GetScansRequest {
                scan_id,
                page_id,
                lean: true,
            };
            api.get_scans(&request).await?
        }
        Command::TestPage {
            page_id,
            pre_scan_id,
            post_scan_id,
        } => {
            let request = TestPageRequest {
                page_id,
                pre_scan: pre_scan_id,
                post_scan: post_scan_id,
            };
            api.test_page(&request).await?
        }
        Command::GetTests { test_id, page_id } => {
            let request = GetTestsRequest {
                test_id,
                page_id,
                lean: true,
            };
            api.get_tests(&request).await?
        }
        Command::GetCases { case_id, site_id } => {
            api.get_cases(&GetCasesRequest { case_id, site_id }).await?
        }
        Command::DeleteCase { case_id } => api.delete_case(&case_id).await?,
        Command::GetTestcases {
            testcase_id,
            site_id,
        } => {
            let request = GetTestcasesRequest {
                testcase_id,
                site_id,
                lean: true,
            };
            api.get_testcases(&request).await?
        }
        Command::DeleteTestcase { testcase_id } => api.delete_testcase(&testcase_id).await?,
        Command::Config { .. } | Command::Check | Command::TestSite(_) | Command::TestcaseSite(_) => {
            anyhow::bail!("not a resource command")
        }
    };

    print_envelope(&envelope, verbose);
    Ok(envelope.succeeded)
}
